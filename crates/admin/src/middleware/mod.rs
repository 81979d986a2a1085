//! HTTP middleware for the admin panel: sessions and the admin gate.

pub mod auth;
pub mod session;

pub use auth::{CurrentAdmin, RequireAdmin, clear_current_admin, set_current_admin};
pub use session::create_session_layer;
