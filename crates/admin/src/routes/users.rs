//! User management: roles and the ban flag.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use meblihub_core::UserId;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// One user row for the template.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub banned: bool,
    pub registered: String,
}

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub rows: Vec<UserRow>,
    pub total: usize,
    pub admins: usize,
    pub banned: usize,
}

/// Update form: role and ban flag.
#[derive(Debug, Deserialize)]
pub struct UserUpdateForm {
    pub role: String,
    pub banned: Option<String>,
}

/// `GET /users`.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
) -> Result<UsersTemplate> {
    let users = state.api().list_users(&current.token).await?;

    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            id: u.id.as_str().to_owned(),
            name: u.name.clone().unwrap_or_default(),
            email: u.email.clone().unwrap_or_default(),
            role: u.role.clone().unwrap_or_else(|| "user".to_owned()),
            banned: u.is_banned(),
            registered: u
                .created_at
                .map(|dt| dt.format("%d.%m.%Y").to_string())
                .unwrap_or_default(),
        })
        .collect();

    Ok(UsersTemplate {
        total: rows.len(),
        admins: rows.iter().filter(|r| r.role == "admin").count(),
        banned: rows.iter().filter(|r| r.banned).count(),
        rows,
    })
}

/// `POST /users/{id}` - update role / ban flag.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<UserUpdateForm>,
) -> Result<Redirect> {
    let id = UserId::new(id);
    let role = if form.role == "admin" { "admin" } else { "user" };

    let payload = json!({
        "role": role,
        "banned": form.banned.is_some(),
    });
    state.api().update_user(&current.token, &id, &payload).await?;
    Ok(Redirect::to("/users"))
}

/// `POST /users/{id}/delete`.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = UserId::new(id);
    state.api().delete_user(&current.token, &id).await?;
    Ok(Redirect::to("/users"))
}
