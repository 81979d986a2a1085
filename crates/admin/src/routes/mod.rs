//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                      - Dashboard
//! GET  /login                 - Login page
//! POST /login                 - Login (role-gated)
//! POST /logout                - Logout
//!
//! # Products
//! GET  /products              - Product list (with search)
//! GET  /products/new          - Create form
//! POST /products              - Create
//! GET  /products/{id}/edit    - Edit form
//! POST /products/{id}         - Update
//! POST /products/{id}/delete  - Delete
//!
//! # Categories
//! GET  /categories            - Category list + create form
//! POST /categories            - Create
//! POST /categories/{id}       - Update
//! POST /categories/{id}/delete - Delete
//!
//! # Orders
//! GET  /orders                - Paginated list (?q=&status=&page=)
//! GET  /orders/{id}           - Detail + status/note form
//! POST /orders/{id}           - Patch status / admin note
//! POST /orders/{id}/cancel    - Cancel with reason
//! POST /orders/{id}/delete    - Delete
//!
//! # Users
//! GET  /users                 - User list
//! POST /users/{id}            - Update role / ban flag
//! POST /users/{id}/delete     - Delete
//!
//! # Chat
//! GET  /chat                  - Conversation inbox
//! GET  /chat/{user_id}        - Thread
//! POST /chat/{user_id}        - Reply as the support inbox
//!
//! # Translations
//! GET  /translations          - Per-language JSON view
//! ```

pub mod auth;
pub mod categories;
pub mod chat;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod translations;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        // Products
        .route("/products", get(products::list).post(products::create))
        .route("/products/new", get(products::new_form))
        .route("/products/{id}/edit", get(products::edit_form))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/delete", post(products::delete))
        // Categories
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/{id}", post(categories::update))
        .route("/categories/{id}/delete", post(categories::delete))
        // Orders
        .route("/orders", get(orders::list::index))
        .route("/orders/{id}", get(orders::detail::show).post(orders::actions::save))
        .route("/orders/{id}/cancel", post(orders::actions::cancel))
        .route("/orders/{id}/delete", post(orders::actions::delete))
        // Users
        .route("/users", get(users::list))
        .route("/users/{id}", post(users::update))
        .route("/users/{id}/delete", post(users::delete))
        // Chat
        .route("/chat", get(chat::inbox))
        .route("/chat/{user_id}", get(chat::thread).post(chat::reply))
        // Translations
        .route("/translations", get(translations::view))
}
