//! Panel login: backend auth plus a role gate.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::error::Result;
use crate::middleware::{CurrentAdmin, clear_current_admin, set_current_admin};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: String,
    pub email: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Display login page.
pub async fn login_page() -> LoginTemplate {
    LoginTemplate {
        error: String::new(),
        email: String::new(),
    }
}

/// Login action. Only accounts with the admin role get a session.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.api().login(form.email.trim(), &form.password).await {
        Ok(auth) if auth.user.is_admin() && !auth.user.is_banned() => {
            set_current_admin(
                &session,
                &CurrentAdmin {
                    token: auth.token,
                    user: auth.user,
                },
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
        Ok(_) => Ok(LoginTemplate {
            error: "Цей акаунт не має доступу до панелі".to_owned(),
            email: form.email,
        }
        .into_response()),
        Err(ApiError::Unauthorized | ApiError::Api { status: 400, .. }) => Ok(LoginTemplate {
            error: "Невірний email або пароль".to_owned(),
            email: form.email,
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Logout action.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    Ok(Redirect::to("/login"))
}
