//! Order detail view.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use serde_json::Value;
use tracing::instrument;

use meblihub_core::{OrderId, OrderStatus, format_uah};

use crate::api::types::AdminOrder;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// One line item of the order.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub sku: String,
    pub qty: String,
    pub price: String,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/detail.html")]
pub struct OrderDetailTemplate {
    pub id: String,
    pub status: String,
    pub statuses: Vec<&'static str>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub delivery_summary: String,
    pub comment: String,
    pub note: String,
    pub scheduled_at: String,
    pub lines: Vec<OrderLineView>,
    pub subtotal: String,
    pub total_savings: String,
    pub cart_total: String,
    pub created_at: String,
    pub is_terminal: bool,
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Delivery summary line: method plus the field that matters for it.
fn delivery_summary(delivery: &Value) -> String {
    let method = str_field(delivery, "method");
    let city = str_field(delivery, "city");
    let detail = match method.as_str() {
        "courier" => str_field(delivery, "address"),
        "nova_poshta" => str_field(delivery, "npOffice"),
        _ => str_field(delivery, "pickupLocationId"),
    };
    [city, method, detail]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn order_lines(order: &AdminOrder) -> Vec<OrderLineView> {
    order
        .items
        .iter()
        .map(|item| OrderLineView {
            name: str_field(item, "name"),
            sku: str_field(item, "sku"),
            qty: item
                .get("qty")
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .to_string(),
            price: format_uah(item.get("price").and_then(Value::as_i64).unwrap_or(0)),
        })
        .collect()
}

/// `GET /orders/{id}`.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Result<OrderDetailTemplate> {
    let id = OrderId::new(id);
    let order = state.api().get_order(&current.token, &id).await?;

    let admin_block = order.admin.clone().unwrap_or_default();

    Ok(OrderDetailTemplate {
        id: order.id.as_str().to_owned(),
        status: order.status().to_string(),
        statuses: OrderStatus::ALL.iter().map(|s| s.as_str()).collect(),
        customer_name: str_field(&order.customer, "fullName"),
        customer_phone: str_field(&order.customer, "phone"),
        customer_email: str_field(&order.customer, "email"),
        delivery_summary: delivery_summary(&order.delivery),
        comment: order.comment.clone().unwrap_or_default(),
        note: admin_block.note.unwrap_or_default(),
        scheduled_at: admin_block
            .scheduled_at
            .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
            .unwrap_or_default(),
        lines: order_lines(&order),
        subtotal: format_uah(order.totals.subtotal),
        total_savings: format_uah(order.totals.total_savings),
        cart_total: format_uah(order.totals.cart_total),
        created_at: order
            .created_at
            .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
            .unwrap_or_default(),
        is_terminal: order.status().is_terminal(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delivery_summary_per_method() {
        assert_eq!(
            delivery_summary(&json!({"city": "Київ", "method": "courier", "address": "вул. Хрещатик 1"})),
            "Київ, courier, вул. Хрещатик 1"
        );
        assert_eq!(
            delivery_summary(&json!({"city": "Львів", "method": "nova_poshta", "npOffice": "№12"})),
            "Львів, nova_poshta, №12"
        );
        assert_eq!(
            delivery_summary(&json!({"city": "Одеса", "method": "pickup", "pickupLocationId": "loc1"})),
            "Одеса, pickup, loc1"
        );
        assert_eq!(delivery_summary(&json!({})), "");
    }
}
