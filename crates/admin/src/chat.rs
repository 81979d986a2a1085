//! One-shot sender for support replies.
//!
//! The panel replies through the same chat socket customers use: connect,
//! join as the support inbox, push the message, close. Threads re-render from
//! REST history on reload, so no long-lived connection is needed here.

use futures_util::SinkExt;
use serde_json::json;
use thiserror::Error;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::instrument;

/// Errors that can occur while pushing a reply.
#[derive(Debug, Error)]
pub enum ChatSendError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Send one support reply as the inbox identity.
///
/// # Errors
///
/// Returns an error if the socket cannot be reached or the frames fail to
/// send.
#[instrument(skip(text))]
pub async fn send_reply(
    ws_url: &str,
    inbox: &str,
    receiver: &str,
    text: &str,
) -> Result<(), ChatSendError> {
    let (mut ws, _) = connect_async(ws_url).await?;

    let join = json!({ "event": "join_chat", "data": inbox });
    ws.send(WsMessage::Text(join.to_string().into())).await?;

    let message = json!({
        "event": "send_message",
        "data": {
            "sender": inbox,
            "receiver": receiver,
            "text": text,
            "isGuest": false,
        }
    });
    ws.send(WsMessage::Text(message.to_string().into())).await?;

    ws.close(None).await?;
    Ok(())
}
