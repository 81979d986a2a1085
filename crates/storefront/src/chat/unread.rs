//! Unread-message bookkeeping for the chat widget.
//!
//! A message counts as unread only when it travels from the support admin to
//! this identity while the widget is closed. Opening the widget drains the
//! counter and acknowledges the conversation; while it is open, incoming
//! admin messages are acknowledged immediately.

/// What to do after an incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Not an admin-to-me message; nothing changes.
    Ignored,
    /// Widget closed: badge should now show this count.
    Counted(u32),
    /// Widget open: acknowledge with `mark_read`, badge stays at zero.
    MarkRead,
}

/// Per-connection unread counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreadCounter {
    count: u32,
    is_open: bool,
}

impl UnreadCounter {
    /// A fresh counter: widget closed, nothing unread.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            is_open: false,
        }
    }

    /// Current badge value.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Whether the widget is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// The widget was opened: drain the counter. The caller should emit
    /// `mark_read` when there is a known support admin.
    pub const fn open(&mut self) {
        self.is_open = true;
        self.count = 0;
    }

    /// The widget was closed.
    pub const fn close(&mut self) {
        self.is_open = false;
    }

    /// Register an incoming message.
    ///
    /// `from_admin_to_me` must already encode the sender/receiver check
    /// (sender is the support admin AND receiver is this identity).
    pub const fn on_receive(&mut self, from_admin_to_me: bool) -> ReceiveOutcome {
        if !from_admin_to_me {
            return ReceiveOutcome::Ignored;
        }
        if self.is_open {
            return ReceiveOutcome::MarkRead;
        }
        self.count += 1;
        ReceiveOutcome::Counted(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_admin_messages_while_closed() {
        let mut counter = UnreadCounter::new();
        assert_eq!(counter.on_receive(true), ReceiveOutcome::Counted(1));
        assert_eq!(counter.on_receive(true), ReceiveOutcome::Counted(2));
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_ignores_other_traffic() {
        let mut counter = UnreadCounter::new();
        assert_eq!(counter.on_receive(false), ReceiveOutcome::Ignored);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_open_drains_counter() {
        let mut counter = UnreadCounter::new();
        counter.on_receive(true);
        counter.on_receive(true);

        counter.open();
        assert_eq!(counter.count(), 0);
        assert!(counter.is_open());
    }

    #[test]
    fn test_open_widget_acknowledges_immediately() {
        let mut counter = UnreadCounter::new();
        counter.open();
        assert_eq!(counter.on_receive(true), ReceiveOutcome::MarkRead);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_close_resumes_counting() {
        let mut counter = UnreadCounter::new();
        counter.open();
        counter.close();
        assert_eq!(counter.on_receive(true), ReceiveOutcome::Counted(1));
    }
}
