//! Reconnecting client for the backend chat socket.
//!
//! The connection task runs until the owning [`ChatSocket`] is dropped:
//! connect, announce the identity with `join_chat`, pump frames, and on any
//! failure retry after a short delay, rejoining on every reconnect.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, warn};

use crate::api::types::ChatMessage;

/// Delay between reconnect attempts.
const RECONNECT_DELAY: Duration = Duration::from_millis(400);

/// Buffered outbound events while the socket is (re)connecting.
const OUTBOUND_BUFFER: usize = 64;

/// Buffered inbound events per subscriber.
const EVENT_BUFFER: usize = 64;

/// A message being sent to the support admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub sender: String,
    pub receiver: String,
    pub text: String,
    pub is_guest: bool,
}

/// Read-receipt marker for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRead {
    pub my_id: String,
    pub partner_id: String,
}

/// Chat socket event envelope: `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Announce an identity after connecting.
    JoinChat(String),
    /// Customer -> admin message.
    SendMessage(OutgoingMessage),
    /// A stored message pushed by the backend.
    ReceiveMessage(ChatMessage),
    /// Mark a conversation read.
    MarkRead(MarkRead),
    /// Relay -> browser only: unread counter update.
    Unread(u32),
    /// Browser -> relay only: widget visibility.
    WidgetOpen,
    WidgetClose,
}

/// Handle to a live backend chat connection.
///
/// Dropping the handle stops the connection task.
pub struct ChatSocket {
    outbound_tx: mpsc::Sender<ChatEvent>,
    events_tx: broadcast::Sender<ChatEvent>,
}

impl ChatSocket {
    /// Connect to the backend chat socket as `my_id`.
    ///
    /// The connection is established (and re-established) in a background
    /// task; events can be sent immediately and are buffered until the socket
    /// is up.
    #[must_use]
    pub fn connect(url: String, my_id: String) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        tokio::spawn(run_loop(url, my_id, outbound_rx, events_tx.clone()));

        Self {
            outbound_tx,
            events_tx,
        }
    }

    /// Sender for outbound events.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<ChatEvent> {
        self.outbound_tx.clone()
    }

    /// Subscribe to inbound events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events_tx.subscribe()
    }
}

/// Connection loop: runs until every outbound sender is dropped.
async fn run_loop(
    url: String,
    my_id: String,
    mut outbound_rx: mpsc::Receiver<ChatEvent>,
    events_tx: broadcast::Sender<ChatEvent>,
) {
    loop {
        match connect_async(url.as_str()).await {
            Ok((ws, _)) => {
                debug!(url = %url, "chat socket connected");
                if pump(&my_id, ws, &mut outbound_rx, &events_tx).await {
                    // Owner dropped the handle
                    return;
                }
            }
            Err(e) => {
                warn!(url = %url, "chat socket connect failed: {e}");
            }
        }

        // Drain-check: stop retrying once the owner is gone
        if matches!(
            outbound_rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ) {
            return;
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

/// Pump one live connection. Returns `true` when the owner hung up.
async fn pump(
    my_id: &str,
    ws: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    outbound_rx: &mut mpsc::Receiver<ChatEvent>,
    events_tx: &broadcast::Sender<ChatEvent>,
) -> bool {
    let (mut sink, mut stream) = ws.split();

    // Rejoin on every (re)connect
    let join = ChatEvent::JoinChat(my_id.to_owned());
    if let Ok(json) = serde_json::to_string(&join)
        && sink.send(WsMessage::Text(json.into())).await.is_err()
    {
        return false;
    }

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                let Some(event) = outbound else {
                    // All senders dropped: shut down
                    return true;
                };
                let Ok(json) = serde_json::to_string(&event) else {
                    continue;
                };
                if sink.send(WsMessage::Text(json.into())).await.is_err() {
                    // Reconnect; delivery is at-most-once on our side
                    return false;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        match serde_json::from_str::<ChatEvent>(text.as_str()) {
                            Ok(event) => {
                                let _ = events_tx.send(event);
                            }
                            Err(e) => {
                                debug!("unparseable chat frame: {e}");
                            }
                        }
                    }
                    Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Binary(_) | WsMessage::Frame(_))) => {}
                    Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => {
                        return false;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_envelope_wire_format() {
        let join = ChatEvent::JoinChat("guest_a1b2c3d4".to_owned());
        let json = serde_json::to_value(&join).expect("serialize");
        assert_eq!(json["event"], "join_chat");
        assert_eq!(json["data"], "guest_a1b2c3d4");

        let send = ChatEvent::SendMessage(OutgoingMessage {
            sender: "guest_a1b2c3d4".to_owned(),
            receiver: "admin1".to_owned(),
            text: "Доброго дня".to_owned(),
            is_guest: true,
        });
        let json = serde_json::to_value(&send).expect("serialize");
        assert_eq!(json["event"], "send_message");
        assert_eq!(json["data"]["isGuest"], true);

        let mark = ChatEvent::MarkRead(MarkRead {
            my_id: "u1".to_owned(),
            partner_id: "admin1".to_owned(),
        });
        let json = serde_json::to_value(&mark).expect("serialize");
        assert_eq!(json["event"], "mark_read");
        assert_eq!(json["data"]["myId"], "u1");
        assert_eq!(json["data"]["partnerId"], "admin1");
    }

    #[test]
    fn test_event_round_trip() {
        let events = [
            ChatEvent::JoinChat("u1".to_owned()),
            ChatEvent::WidgetOpen,
            ChatEvent::WidgetClose,
            ChatEvent::Unread(3),
        ];
        for event in events {
            let json = serde_json::to_string(&event).expect("serialize");
            let back: ChatEvent = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, event);
        }
    }

    #[test]
    fn test_receive_message_deserializes_backend_shape() {
        let raw = r#"{
            "event": "receive_message",
            "data": {"_id": "m1", "sender": "admin1", "receiver": "u1", "text": "Вітаю!"}
        }"#;
        let event: ChatEvent = serde_json::from_str(raw).expect("deserialize");
        match event {
            ChatEvent::ReceiveMessage(msg) => {
                assert_eq!(msg.sender, "admin1");
                assert_eq!(msg.text, "Вітаю!");
            }
            other => panic!("wrong event: {other:?}"),
        }
    }
}
