//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page
//! GET  /health                   - Health check
//!
//! # Catalog
//! GET  /catalog                  - Full catalog with filters
//! GET  /catalog/{category}       - Category listing
//! GET  /catalog/{category}/{sub} - Subcategory listing
//! GET  /catalog/{category}/{sub}/{id} - Product page
//! GET  /collections              - Collection cards
//! GET  /collections/{key}        - One collection's products
//! GET  /sales                    - Discounted products
//! GET  /where-to-buy             - Locations grouped by city
//!
//! # Cart (HTMX fragments)
//! GET  /cart                     - Cart page
//! POST /cart/add                 - Add to cart (returns cart_items fragment)
//! POST /cart/update              - Update quantity (fragment)
//! POST /cart/remove              - Remove item (fragment)
//! POST /cart/clear               - Empty the cart (fragment)
//! GET  /cart/count               - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                 - Checkout form
//! POST /checkout                 - Place order
//!
//! # Likes
//! GET  /favorites                - Liked products
//! POST /favorites/toggle         - Toggle a like
//!
//! # Auth (proxied to the catalog API)
//! GET  /auth/login               - Login page
//! POST /auth/login               - Login action
//! GET  /auth/register            - Register page
//! POST /auth/register            - Register action
//! POST /auth/logout              - Logout action
//!
//! # Account (requires auth)
//! GET  /account                  - Account overview
//! GET  /account/orders           - Order history
//!
//! # Chat
//! GET  /chat/history             - Conversation history fragment
//! GET  /chat/ws                  - Browser <-> backend relay socket
//!
//! # Misc
//! GET  /lang/{tag}               - Switch language
//! GET  /currency/{code}          - Switch display currency
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod collections;
pub mod favorites;
pub mod home;
pub mod locations;
pub mod products;
pub mod sales;

use axum::{
    Router,
    extract::Path,
    response::Redirect,
    routing::{get, post},
};
use tower_sessions::Session;

use meblihub_core::Lang;

use crate::api::conversions::{product_href, resolve_image_url};
use crate::api::types::Product;
use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Session key for the selected language.
pub const LANG_SESSION_KEY: &str = "ui.lang";

/// Session key for the selected display currency.
pub const CURRENCY_SESSION_KEY: &str = "ui.currency";

/// Resolve the visitor's language from the session.
pub async fn resolve_lang(session: &Session) -> Lang {
    session
        .get::<String>(LANG_SESSION_KEY)
        .await
        .ok()
        .flatten()
        .map_or(Lang::Ua, |tag| Lang::normalize(&tag))
}

/// Resolve the visitor's display currency (prices are always stored in UAH).
pub async fn resolve_currency(session: &Session) -> String {
    session
        .get::<String>(CURRENCY_SESSION_KEY)
        .await
        .ok()
        .flatten()
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| "UAH".to_owned())
}

/// `GET /lang/{tag}` - persist the language choice and go home.
async fn switch_lang(session: Session, Path(tag): Path<String>) -> Redirect {
    let lang = Lang::normalize(&tag);
    let _ = session.insert(LANG_SESSION_KEY, lang.as_str()).await;
    Redirect::to("/")
}

/// `GET /currency/{code}` - persist the display currency and go home.
async fn switch_currency(session: Session, Path(code): Path<String>) -> Redirect {
    let code = code.trim().to_uppercase();
    if matches!(code.as_str(), "UAH" | "USD" | "EUR") {
        let _ = session.insert(CURRENCY_SESSION_KEY, &code).await;
    }
    Redirect::to("/")
}

// =============================================================================
// Shared view models
// =============================================================================

/// Product card used by every grid (home, catalog, favorites, collections).
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub href: String,
    pub title: String,
    pub image: String,
    /// Formatted final price.
    pub price: String,
    /// Struck-through base price when discounted.
    pub old_price: Option<String>,
    /// `-15%` style badge when discounted.
    pub discount_badge: Option<String>,
    pub liked: bool,
    pub has_model: bool,
}

impl ProductCardView {
    /// Build a card from a product document.
    #[must_use]
    pub fn from_product(
        product: &Product,
        origin: &str,
        lang: Lang,
        liked_ids: &[String],
    ) -> Self {
        let id = product.id.as_str().to_owned();
        let title = {
            let picked = product.name.pick(lang);
            if picked.is_empty() { id.clone() } else { picked }
        };
        let image = product.primary_image().map_or_else(
            || crate::api::conversions::PLACEHOLDER_IMAGE.to_owned(),
            |raw| resolve_image_url(origin, raw),
        );

        let discounted = product.has_discount();
        Self {
            href: product_href(
                product.category.as_deref(),
                product.sub_category.as_deref(),
                &id,
            ),
            title,
            image,
            price: meblihub_core::format_uah(product.final_price()),
            old_price: discounted.then(|| meblihub_core::format_uah(product.base_price())),
            discount_badge: discounted.then(|| format!("-{}%", product.discount_pct())),
            liked: liked_ids.iter().any(|liked| liked == &id),
            has_model: product.has_model(),
            id,
        }
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the auth routes router (strictly rate limited).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .layer(api_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders", get(account::orders))
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(chat::history))
        .route("/ws", get(chat::ws))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/catalog", get(catalog::index))
        .route("/catalog/{category}", get(catalog::category))
        .route("/catalog/{category}/{sub}", get(catalog::subcategory))
        .route("/catalog/{category}/{sub}/{id}", get(products::show))
        // Collections & sales
        .route("/collections", get(collections::index))
        .route("/collections/{key}", get(collections::show))
        .route("/sales", get(sales::index))
        // Locations
        .route("/where-to-buy", get(locations::index))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Likes
        .route("/favorites", get(favorites::index))
        .route(
            "/favorites/toggle",
            post(favorites::toggle).layer(api_rate_limiter()),
        )
        // Account
        .nest("/account", account_routes())
        // Auth
        .nest("/auth", auth_routes())
        // Chat
        .nest("/chat", chat_routes())
        // Language / currency switch
        .route("/lang/{tag}", get(switch_lang))
        .route("/currency/{code}", get(switch_currency))
}
