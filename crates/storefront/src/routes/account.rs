//! Account pages: profile overview and order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use meblihub_core::format_uah;

use crate::api::types::Order;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub name: String,
    pub email: String,
    pub order_count: usize,
    pub logged_in: bool,
}

/// One displayed order.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: String,
    pub status: String,
    pub created_at: String,
    pub item_count: u32,
    pub total: String,
    pub highlighted: bool,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
    pub logged_in: bool,
}

/// Highlight query (`?order=...` after checkout).
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub order: Option<String>,
}

fn order_view(order: &Order, highlighted_id: Option<&str>) -> OrderView {
    OrderView {
        id: order.id.as_str().to_owned(),
        status: order.status().to_string(),
        created_at: order
            .created_at
            .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
            .unwrap_or_default(),
        item_count: order.items.iter().map(|i| i.qty).sum(),
        total: format_uah(order.totals.cart_total),
        highlighted: highlighted_id == Some(order.id.as_str()),
    }
}

/// `GET /account` - profile overview.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<AccountTemplate> {
    let orders = state.api().my_orders(&current.token).await.unwrap_or_default();

    Ok(AccountTemplate {
        name: current.user.name.clone().unwrap_or_default(),
        email: current.user.email.clone().unwrap_or_default(),
        order_count: orders.len(),
        logged_in: true,
    })
}

/// `GET /account/orders` - order history, newest first.
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<OrdersQuery>,
) -> Result<OrdersTemplate> {
    let mut orders = state.api().my_orders(&current.token).await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(OrdersTemplate {
        orders: orders
            .iter()
            .map(|o| order_view(o, query.order.as_deref()))
            .collect(),
        logged_in: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_view() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "status": "shipped",
            "createdAt": "2026-07-01T10:30:00Z",
            "items": [{"productId": "p1", "qty": 2}, {"productId": "p2", "qty": 1}],
            "totals": {"subtotal": 24000, "totalSavings": 3600, "cartTotal": 20400},
        }))
        .expect("fixture");

        let view = order_view(&order, Some("o1"));
        assert_eq!(view.status, "shipped");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "20\u{a0}400\u{a0}грн");
        assert!(view.highlighted);
        assert_eq!(view.created_at, "01.07.2026 10:30");
    }
}
