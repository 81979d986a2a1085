//! Support chat.
//!
//! The storefront keeps one persistent channel to the backend chat socket per
//! connected browser tab and relays events both ways. Events are JSON
//! envelopes `{"event": ..., "data": ...}` with the backend's event names
//! (`join_chat`, `send_message`, `receive_message`, `mark_read`).

pub mod socket;
pub mod unread;

pub use socket::{ChatEvent, ChatSocket, MarkRead, OutgoingMessage};
pub use unread::{ReceiveOutcome, UnreadCounter};

use rand::Rng;
use rand::distr::Alphanumeric;

/// Prefix marking guest (not logged-in) chat identities.
pub const GUEST_PREFIX: &str = "guest_";

/// Generate a fresh guest chat id (`guest_` + 8 alphanumeric chars).
#[must_use]
pub fn generate_guest_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{GUEST_PREFIX}{}", suffix.to_lowercase())
}

/// Whether a chat identity belongs to a guest.
#[must_use]
pub fn is_guest(id: &str) -> bool {
    id.starts_with(GUEST_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_guest_id_shape() {
        let id = generate_guest_id();
        assert!(id.starts_with(GUEST_PREFIX));
        assert_eq!(id.len(), GUEST_PREFIX.len() + 8);
        assert!(is_guest(&id));
    }

    #[test]
    fn test_is_guest() {
        assert!(is_guest("guest_a1b2c3d4"));
        assert!(!is_guest("66f2a1b3c4d5e6f7a8b9c0d1"));
    }
}
