//! Cart route handlers.
//!
//! Cart state lives in the catalog API under the user's account; every
//! mutation returns the fresh payload, which is re-priced and re-rendered as
//! an HTMX fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use meblihub_core::{ProductId, format_uah};

use super::resolve_lang;
use crate::api::types::CartPayload;
use crate::cart::PricedCart;
use crate::error::Result;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub href: String,
    pub name: String,
    pub sku: String,
    pub image: String,
    pub qty: u32,
    pub price: String,
    pub old_price: Option<String>,
    pub line_total: String,
    pub line_savings: Option<String>,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub total_savings: Option<String>,
    pub cart_total: String,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            item_count: 0,
            subtotal: format_uah(0),
            total_savings: None,
            cart_total: format_uah(0),
        }
    }

    fn from_priced(priced: &PricedCart) -> Self {
        Self {
            items: priced
                .lines
                .iter()
                .map(|line| CartItemView {
                    product_id: line.product_id.as_str().to_owned(),
                    href: line.href.clone(),
                    name: line.name.clone(),
                    sku: line.sku.clone(),
                    image: line.image_src.clone(),
                    qty: line.qty,
                    price: format_uah(line.final_price),
                    old_price: (line.old_price > 0).then(|| format_uah(line.old_price)),
                    line_total: format_uah(line.line_total),
                    line_savings: (line.line_savings > 0).then(|| format_uah(line.line_savings)),
                })
                .collect(),
            item_count: priced.total_items,
            subtotal: format_uah(priced.subtotal),
            total_savings: (priced.total_savings > 0).then(|| format_uah(priced.total_savings)),
            cart_total: format_uah(priced.cart_total),
        }
    }
}

async fn priced_view(state: &AppState, session: &Session, payload: &CartPayload) -> CartView {
    let lang = resolve_lang(session).await;
    let priced = PricedCart::from_payload(payload, state.api().origin(), lang);
    CartView::from_priced(&priced)
}

// =============================================================================
// Form payloads
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub qty: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub qty: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub logged_in: bool,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
) -> Result<CartShowTemplate> {
    let Some(current) = current else {
        // Anonymous visitors see an empty cart with a login prompt
        return Ok(CartShowTemplate {
            cart: CartView::empty(),
            logged_in: false,
        });
    };

    let cart = match state.api().get_cart(&current.token).await {
        Ok(payload) => priced_view(&state, &session, &payload).await,
        Err(e) => {
            tracing::warn!("failed to fetch cart: {e}");
            CartView::empty()
        }
    };

    Ok(CartShowTemplate {
        cart,
        logged_in: true,
    })
}

/// Add item to cart (HTMX fragment).
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Result<CartItemsTemplate> {
    let product_id = ProductId::new(form.product_id);
    let qty = form.qty.unwrap_or(1).max(1);

    let payload = state
        .api()
        .add_to_cart(&current.token, &product_id, qty)
        .await?;

    Ok(CartItemsTemplate {
        cart: priced_view(&state, &session, &payload).await,
    })
}

/// Update line quantity (HTMX fragment).
#[instrument(skip_all, fields(product_id = %form.product_id, qty = form.qty))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<UpdateCartForm>,
) -> Result<CartItemsTemplate> {
    let product_id = ProductId::new(form.product_id);
    let qty = form.qty.max(1);

    let payload = state
        .api()
        .update_cart_qty(&current.token, &product_id, qty)
        .await?;

    Ok(CartItemsTemplate {
        cart: priced_view(&state, &session, &payload).await,
    })
}

/// Remove a line (HTMX fragment).
#[instrument(skip_all, fields(product_id = %form.product_id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<CartItemsTemplate> {
    let product_id = ProductId::new(form.product_id);

    let payload = state
        .api()
        .remove_cart_item(&current.token, &product_id)
        .await?;

    Ok(CartItemsTemplate {
        cart: priced_view(&state, &session, &payload).await,
    })
}

/// Empty the cart (HTMX fragment).
#[instrument(skip_all)]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<CartItemsTemplate> {
    let payload = state.api().clear_cart(&current.token).await?;

    Ok(CartItemsTemplate {
        cart: priced_view(&state, &session, &payload).await,
    })
}

/// Cart count badge (HTMX fragment).
#[instrument(skip_all)]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
) -> Result<CartCountTemplate> {
    let count = match current {
        Some(current) => match state.api().get_cart(&current.token).await {
            Ok(payload) => {
                let lang = resolve_lang(&session).await;
                PricedCart::from_payload(&payload, state.api().origin(), lang).total_items
            }
            Err(_) => 0,
        },
        None => 0,
    };

    Ok(CartCountTemplate { count })
}
