//! Auth pages: thin pass-through to the catalog API's JWT auth.
//!
//! The storefront never sees password hashes; it exchanges credentials for a
//! bearer token and keeps the token (plus the user document) in the session.

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
use crate::middleware::{CurrentUser, clear_current_user, set_current_user};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: String,
    pub email: String,
    pub logged_in: bool,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: String,
    pub name: String,
    pub email: String,
    pub logged_in: bool,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Register form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Display login page.
pub async fn login_page() -> LoginTemplate {
    LoginTemplate {
        error: String::new(),
        email: String::new(),
        logged_in: false,
    }
}

/// Login action.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.api().login(form.email.trim(), &form.password).await {
        Ok(auth) => {
            if auth.user.is_banned() {
                return Ok(LoginTemplate {
                    error: "Обліковий запис заблоковано".to_owned(),
                    email: form.email,
                    logged_in: false,
                }
                .into_response());
            }

            crate::error::set_sentry_user(&auth.user.id, auth.user.email.as_deref());
            set_current_user(
                &session,
                &CurrentUser {
                    token: auth.token,
                    user: auth.user,
                },
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(ApiError::Unauthorized | ApiError::Api { status: 400, .. }) => Ok(LoginTemplate {
            error: "Невірний email або пароль".to_owned(),
            email: form.email,
            logged_in: false,
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Display register page.
pub async fn register_page() -> RegisterTemplate {
    RegisterTemplate {
        error: String::new(),
        name: String::new(),
        email: String::new(),
        logged_in: false,
    }
}

/// Register action.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    match state
        .api()
        .register(form.name.trim(), form.email.trim(), &form.password)
        .await
    {
        Ok(auth) => {
            crate::error::set_sentry_user(&auth.user.id, auth.user.email.as_deref());
            set_current_user(
                &session,
                &CurrentUser {
                    token: auth.token,
                    user: auth.user,
                },
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(ApiError::Api { message, .. }) => Ok(RegisterTemplate {
            error: if message.is_empty() {
                "Не вдалося зареєструватися".to_owned()
            } else {
                message
            },
            name: form.name,
            email: form.email,
            logged_in: false,
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Logout action.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    crate::error::clear_sentry_user();
    Ok(Redirect::to("/"))
}
