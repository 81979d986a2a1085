//! Chat widget endpoints: history fragment and the relay socket.
//!
//! The browser speaks the same JSON envelopes as the backend socket; the
//! relay owns the backend connection (with its reconnect loop) and the
//! unread bookkeeping for the badge.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message as BrowserMessage, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tower_sessions::Session;
use tracing::{debug, instrument, warn};

use crate::chat::{
    ChatEvent, ChatSocket, MarkRead, ReceiveOutcome, UnreadCounter, generate_guest_id,
};
use crate::error::Result;
use crate::middleware::{OptionalAuth, session_keys};
use crate::state::AppState;

/// Greeting shown at the top of every conversation (local, never persisted).
const GREETING: &str = "Вітаємо. Напишіть, будь ласка, ваше питання — ми допоможемо.";

/// One rendered chat line.
#[derive(Debug, Clone)]
pub struct ChatLineView {
    pub text: String,
    pub time: String,
    /// `me` | `them` | `sys`, drives the bubble style.
    pub side: String,
}

/// Chat history fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_history.html")]
pub struct ChatHistoryTemplate {
    pub lines: Vec<ChatLineView>,
    pub my_id: String,
    /// Empty until the support admin id is known; the input stays disabled.
    pub admin_id: String,
}

/// Resolve the chat identity: user id when logged in, otherwise a
/// session-persisted guest id.
pub async fn chat_identity(session: &Session, current: Option<&crate::middleware::CurrentUser>) -> String {
    if let Some(current) = current {
        return current.user.id.as_str().to_owned();
    }

    if let Ok(Some(existing)) = session.get::<String>(session_keys::GUEST_CHAT_ID).await
        && !existing.is_empty()
    {
        return existing;
    }

    let fresh = generate_guest_id();
    let _ = session.insert(session_keys::GUEST_CHAT_ID, &fresh).await;
    fresh
}

/// `GET /chat/history` - the conversation so far, greeting first.
#[instrument(skip_all)]
pub async fn history(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
) -> Result<ChatHistoryTemplate> {
    let my_id = chat_identity(&session, current.as_ref()).await;

    let admin_id = match state.api().support_admin().await {
        Ok(support) => support.admin_id,
        Err(e) => {
            // The widget still renders; sending stays disabled
            warn!("support admin lookup failed: {e}");
            String::new()
        }
    };

    let mut lines = vec![ChatLineView {
        text: GREETING.to_owned(),
        time: String::new(),
        side: "sys".to_owned(),
    }];

    if !admin_id.is_empty() {
        match state.api().message_history(&my_id, &admin_id).await {
            Ok(messages) => {
                lines.extend(messages.iter().map(|m| ChatLineView {
                    text: m.text.clone(),
                    time: m
                        .created_at
                        .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
                        .unwrap_or_default(),
                    side: if m.sender == my_id { "me" } else { "them" }.to_owned(),
                }));
            }
            Err(e) => {
                // History may fail; the widget still works
                debug!("chat history fetch failed: {e}");
            }
        }
    }

    Ok(ChatHistoryTemplate {
        lines,
        my_id,
        admin_id,
    })
}

/// `GET /chat/ws` - upgrade and relay between the browser and the backend.
#[instrument(skip_all)]
pub async fn ws(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    upgrade: WebSocketUpgrade,
) -> Response {
    let my_id = chat_identity(&session, current.as_ref()).await;
    upgrade.on_upgrade(move |socket| relay(socket, state, my_id))
}

/// Pump events between one browser tab and the backend chat socket.
async fn relay(browser: WebSocket, state: AppState, my_id: String) {
    let admin_id = match state.api().support_admin().await {
        Ok(support) => support.admin_id,
        Err(e) => {
            warn!("support admin lookup failed: {e}");
            String::new()
        }
    };

    let upstream = ChatSocket::connect(state.config().api.chat_ws_url(), my_id.clone());
    let upstream_tx = upstream.sender();
    let mut upstream_rx = upstream.subscribe();

    let (mut browser_tx, mut browser_rx) = browser.split();
    let mut unread = UnreadCounter::new();

    loop {
        tokio::select! {
            from_browser = browser_rx.next() => {
                let Some(Ok(message)) = from_browser else {
                    break;
                };
                let BrowserMessage::Text(text) = message else {
                    continue;
                };
                let Ok(event) = serde_json::from_str::<ChatEvent>(text.as_str()) else {
                    debug!("unparseable browser chat frame");
                    continue;
                };

                match event {
                    ChatEvent::WidgetOpen => {
                        unread.open();
                        if !admin_id.is_empty() {
                            let _ = upstream_tx
                                .send(ChatEvent::MarkRead(MarkRead {
                                    my_id: my_id.clone(),
                                    partner_id: admin_id.clone(),
                                }))
                                .await;
                        }
                        let _ = send_event(&mut browser_tx, &ChatEvent::Unread(0)).await;
                    }
                    ChatEvent::WidgetClose => unread.close(),
                    ChatEvent::SendMessage(_) | ChatEvent::MarkRead(_) => {
                        let _ = upstream_tx.send(event).await;
                    }
                    // join_chat is the relay's job; the rest is outbound-only
                    _ => {}
                }
            }
            from_upstream = upstream_rx.recv() => {
                let event = match from_upstream {
                    Ok(event) => event,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!("chat relay lagged by {n} events");
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };

                if let ChatEvent::ReceiveMessage(msg) = &event {
                    let from_admin_to_me =
                        !admin_id.is_empty() && msg.sender == admin_id && msg.receiver == my_id;
                    match unread.on_receive(from_admin_to_me) {
                        ReceiveOutcome::Counted(count) => {
                            let _ = send_event(&mut browser_tx, &ChatEvent::Unread(count)).await;
                        }
                        ReceiveOutcome::MarkRead => {
                            let _ = upstream_tx
                                .send(ChatEvent::MarkRead(MarkRead {
                                    my_id: my_id.clone(),
                                    partner_id: admin_id.clone(),
                                }))
                                .await;
                        }
                        ReceiveOutcome::Ignored => {}
                    }
                }

                if send_event(&mut browser_tx, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    debug!(my_id = %my_id, "chat relay closed");
}

async fn send_event(
    sink: &mut (impl SinkExt<BrowserMessage> + Unpin),
    event: &ChatEvent,
) -> std::result::Result<(), ()> {
    let Ok(json) = serde_json::to_string(event) else {
        return Ok(());
    };
    sink.send(BrowserMessage::Text(json.into()))
        .await
        .map_err(|_| ())
}
