//! Order mutations: status/note save, cancel, delete.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use meblihub_core::{OrderId, OrderStatus};

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Save form: status plus the admin note block.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveForm {
    pub status: String,
    pub note: String,
    /// `datetime-local` value; empty clears the schedule.
    pub scheduled_at: String,
}

/// Cancel form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CancelForm {
    pub reason: String,
}

/// `POST /orders/{id}` - patch status and admin block.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn save(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<SaveForm>,
) -> Result<Redirect> {
    let id = OrderId::new(id);
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(|_| AdminError::BadRequest(format!("unknown status: {}", form.status)))?;

    let scheduled_at = {
        let trimmed = form.scheduled_at.trim();
        if trimmed.is_empty() {
            serde_json::Value::Null
        } else {
            // datetime-local has no zone; store it as-is and let the backend
            // interpret it in shop time
            json!(trimmed)
        }
    };

    let payload = json!({
        "status": status.as_str(),
        "admin": {
            "note": form.note.trim(),
            "scheduledAt": scheduled_at,
        }
    });

    state.api().patch_order(&current.token, &id, &payload).await?;
    Ok(Redirect::to(&format!("/orders/{id}")))
}

/// `POST /orders/{id}/cancel`.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<CancelForm>,
) -> Result<Redirect> {
    let id = OrderId::new(id);
    state
        .api()
        .cancel_order(&current.token, &id, form.reason.trim())
        .await?;
    Ok(Redirect::to(&format!("/orders/{id}")))
}

/// `POST /orders/{id}/delete`.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = OrderId::new(id);
    state.api().delete_order(&current.token, &id).await?;
    Ok(Redirect::to("/orders"))
}
