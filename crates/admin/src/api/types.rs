//! Admin-facing API types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meblihub_core::{CategoryId, LocalizedText, OrderId, OrderStatus, ProductId, UserId};

/// A product row in the admin list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminProduct {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub sku: Option<String>,
    pub images: Vec<String>,
    pub image: Option<String>,
    pub model_url: Option<String>,
    pub in_stock: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub weight: Option<f64>,
}

impl AdminProduct {
    /// Rounded base price for list display.
    #[must_use]
    pub fn base_price(&self) -> i64 {
        let price = self.price.unwrap_or(0.0);
        if price.is_finite() && price > 0.0 {
            #[allow(clippy::cast_possible_truncation)]
            {
                price.round() as i64
            }
        } else {
            0
        }
    }

    /// Whole discount percentage.
    #[must_use]
    pub fn discount_pct(&self) -> i64 {
        let pct = self.discount.unwrap_or(0.0);
        if pct.is_finite() && pct > 0.0 {
            #[allow(clippy::cast_possible_truncation)]
            {
                pct.floor() as i64
            }
        } else {
            0
        }
    }

    /// Discounted price for list display.
    #[must_use]
    pub fn discounted_price(&self) -> i64 {
        meblihub_core::apply_discount(self.base_price(), self.discount_pct())
    }
}

/// A category row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminCategory {
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    pub category: String,
    pub name: Option<String>,
    pub names: Option<LocalizedText>,
    pub subcategories: Vec<serde_json::Value>,
}

/// A user row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub banned: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminUser {
    /// Whether this user has the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    /// Whether this account is banned.
    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.banned.unwrap_or(false)
    }
}

/// An order row (same document the storefront sees, plus the admin block).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminOrder {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    pub status: Option<String>,
    pub customer: serde_json::Value,
    pub delivery: serde_json::Value,
    pub comment: Option<String>,
    pub items: Vec<serde_json::Value>,
    pub totals: OrderTotals,
    pub admin: Option<AdminOrderBlock>,
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminOrder {
    /// Parsed status; unknown strings read as [`OrderStatus::New`].
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// Totals block of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub total_savings: i64,
    pub cart_total: i64,
}

/// Back-office-only block on an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminOrderBlock {
    pub note: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Paginated order list response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderListResponse {
    pub items: Vec<AdminOrder>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

/// One support conversation in the admin inbox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversation {
    pub user_id: String,
    pub user_name: Option<String>,
    pub last_message: Option<String>,
    pub unread: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A chat message (same wire shape as the storefront's).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMessage {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<meblihub_core::MessageId>,
    pub sender: String,
    pub receiver: String,
    pub text: String,
    pub is_guest: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Login response from the catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AdminUser,
}

/// Response of `GET /api/chat/support-admin`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportAdmin {
    pub admin_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_product_pricing() {
        let product: AdminProduct = serde_json::from_str(
            r#"{"_id": "p1", "price": 10000, "discount": 25}"#,
        )
        .expect("parse");
        assert_eq!(product.base_price(), 10000);
        assert_eq!(product.discounted_price(), 7500);
    }

    #[test]
    fn test_order_list_response_tolerates_missing_fields() {
        let response: OrderListResponse = serde_json::from_str(r#"{"items": []}"#).expect("parse");
        assert_eq!(response.total, 0);
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_admin_order_status() {
        let order: AdminOrder = serde_json::from_str(
            r#"{"_id": "o1", "status": "processing", "admin": {"note": "call first"}}"#,
        )
        .expect("parse");
        assert_eq!(order.status(), OrderStatus::Processing);
        assert_eq!(
            order.admin.and_then(|a| a.note),
            Some("call first".to_owned())
        );
    }
}
