//! Admin authentication extractor.
//!
//! The catalog API owns accounts and roles; the panel only admits users whose
//! login response carries `role: "admin"`, and keeps their bearer token in
//! the session.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::api::types::AdminUser;

/// Session key for the logged-in admin.
pub const CURRENT_ADMIN_KEY: &str = "auth.current_admin";

/// The logged-in admin as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Bearer token for catalog API calls.
    pub token: String,
    /// Cached admin user document.
    pub user: AdminUser,
}

/// Extractor that requires an admin session; otherwise redirects to `/login`.
pub struct RequireAdmin(pub CurrentAdmin);

/// Rejection: always a redirect to the login page.
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(AdminRejection)?;

        let current: CurrentAdmin = session
            .get(CURRENT_ADMIN_KEY)
            .await
            .ok()
            .flatten()
            .ok_or(AdminRejection)?;

        // Role could have been revoked since login; the API will reject the
        // token then, but don't even try for obviously stale sessions
        if !current.user.is_admin() {
            return Err(AdminRejection);
        }

        Ok(Self(current))
    }
}

/// Store the admin in the session after a role-checked login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    current: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(CURRENT_ADMIN_KEY, current).await
}

/// Remove the admin from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(CURRENT_ADMIN_KEY)
        .await
        .map(|_| ())
}
