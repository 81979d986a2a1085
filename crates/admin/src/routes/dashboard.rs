//! Dashboard: headline counts from the list endpoints.
//!
//! Each count degrades to zero independently when its endpoint fails, the
//! way a back-office landing page should.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub products: usize,
    pub categories: usize,
    pub users: usize,
    pub conversations: usize,
    pub new_orders: u64,
}

/// `GET /` - the landing page.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
) -> Result<DashboardTemplate> {
    let token = &current.token;
    let api = state.api();

    let (products, categories, users, conversations, orders) = tokio::join!(
        api.list_products(token),
        api.list_categories(token),
        api.list_users(token),
        api.chat_conversations(token),
        api.list_orders(token, "", Some(meblihub_core::OrderStatus::New), 1, 1),
    );

    Ok(DashboardTemplate {
        admin_name: current.user.name.clone().unwrap_or_default(),
        products: products.map(|p| p.len()).unwrap_or_default(),
        categories: categories.map(|c| c.len()).unwrap_or_default(),
        users: users.map(|u| u.len()).unwrap_or_default(),
        conversations: conversations.map(|c| c.len()).unwrap_or_default(),
        new_orders: orders.map(|o| o.total).unwrap_or_default(),
    })
}
