//! Support inbox: conversations, thread view, replies.
//!
//! The inbox identity is the backend's designated support admin; every admin
//! in the panel works that shared queue, as the support team always has.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// One inbox row.
#[derive(Debug, Clone)]
pub struct ConversationRow {
    pub user_id: String,
    pub href: String,
    pub user_name: String,
    pub last_message: String,
    pub unread: i64,
    pub updated_at: String,
}

/// Inbox template.
#[derive(Template, WebTemplate)]
#[template(path = "chat/inbox.html")]
pub struct InboxTemplate {
    pub conversations: Vec<ConversationRow>,
}

/// One thread line.
#[derive(Debug, Clone)]
pub struct ThreadLine {
    pub text: String,
    pub time: String,
    pub mine: bool,
}

/// Thread template.
#[derive(Template, WebTemplate)]
#[template(path = "chat/thread.html")]
pub struct ThreadTemplate {
    pub partner_id: String,
    pub partner_label: String,
    pub lines: Vec<ThreadLine>,
}

/// Reply form.
#[derive(Debug, Deserialize)]
pub struct ReplyForm {
    pub text: String,
}

/// The shared inbox identity (falls back to the logged-in admin's id).
async fn inbox_id(state: &AppState, current_admin_id: &str) -> String {
    match state.api().support_admin().await {
        Ok(support) if !support.admin_id.is_empty() => support.admin_id,
        Ok(_) => current_admin_id.to_owned(),
        Err(e) => {
            warn!("support admin lookup failed: {e}");
            current_admin_id.to_owned()
        }
    }
}

/// `GET /chat` - the inbox.
#[instrument(skip_all)]
pub async fn inbox(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
) -> Result<InboxTemplate> {
    let conversations = state.api().chat_conversations(&current.token).await?;

    Ok(InboxTemplate {
        conversations: conversations
            .iter()
            .map(|c| ConversationRow {
                user_id: c.user_id.clone(),
                href: format!("/chat/{}", urlencoding::encode(&c.user_id)),
                user_name: c.user_name.clone().unwrap_or_else(|| c.user_id.clone()),
                last_message: c.last_message.clone().unwrap_or_default(),
                unread: c.unread.unwrap_or(0),
                updated_at: c
                    .updated_at
                    .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
                    .unwrap_or_default(),
            })
            .collect(),
    })
}

/// `GET /chat/{user_id}` - one conversation.
#[instrument(skip_all, fields(partner = %user_id))]
pub async fn thread(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(user_id): Path<String>,
) -> Result<ThreadTemplate> {
    let inbox = inbox_id(&state, current.user.id.as_str()).await;
    let messages = state.api().message_history(&inbox, &user_id).await?;

    Ok(ThreadTemplate {
        partner_label: user_id.clone(),
        partner_id: user_id,
        lines: messages
            .iter()
            .map(|m| ThreadLine {
                text: m.text.clone(),
                time: m
                    .created_at
                    .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
                    .unwrap_or_default(),
                mine: m.sender == inbox,
            })
            .collect(),
    })
}

/// `POST /chat/{user_id}` - reply as the support inbox.
#[instrument(skip_all, fields(partner = %user_id))]
pub async fn reply(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(user_id): Path<String>,
    Form(form): Form<ReplyForm>,
) -> Result<Redirect> {
    let text = form.text.trim();
    if text.is_empty() {
        return Ok(Redirect::to(&format!(
            "/chat/{}",
            urlencoding::encode(&user_id)
        )));
    }

    let inbox = inbox_id(&state, current.user.id.as_str()).await;
    crate::chat::send_reply(&state.config().chat_ws_url(), &inbox, &user_id, text)
        .await
        .map_err(|e| AdminError::Internal(format!("chat send failed: {e}")))?;

    Ok(Redirect::to(&format!(
        "/chat/{}",
        urlencoding::encode(&user_id)
    )))
}
