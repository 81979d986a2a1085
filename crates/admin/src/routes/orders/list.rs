//! Order list with search, status filter, and pagination.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use meblihub_core::{OrderStatus, format_uah};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Orders per page.
const PAGE_LIMIT: u64 = 20;

/// List query params.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrdersQuery {
    pub q: String,
    pub status: String,
    pub page: Option<u64>,
}

/// One order row.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub href: String,
    pub customer: String,
    pub status: String,
    pub total: String,
    pub created_at: String,
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/list.html")]
pub struct OrdersListTemplate {
    pub rows: Vec<OrderRow>,
    pub q: String,
    pub status: String,
    pub statuses: Vec<&'static str>,
    pub page: u64,
    pub pages: u64,
    pub total: u64,
}

/// `GET /orders`.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Query(query): Query<OrdersQuery>,
) -> Result<OrdersListTemplate> {
    let status_filter: Option<OrderStatus> = query.status.parse().ok();
    let page = query.page.unwrap_or(1).max(1);

    let response = state
        .api()
        .list_orders(&current.token, &query.q, status_filter, page, PAGE_LIMIT)
        .await?;

    let rows = response
        .items
        .iter()
        .map(|order| OrderRow {
            id: order.id.as_str().to_owned(),
            href: format!("/orders/{}", order.id),
            customer: order
                .customer
                .get("fullName")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            status: order.status().to_string(),
            total: format_uah(order.totals.cart_total),
            created_at: order
                .created_at
                .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
                .unwrap_or_default(),
        })
        .collect();

    Ok(OrdersListTemplate {
        rows,
        q: query.q,
        status: query.status,
        statuses: OrderStatus::ALL.iter().map(|s| s.as_str()).collect(),
        page: response.page.max(1),
        pages: response.pages.max(1),
        total: response.total,
    })
}
