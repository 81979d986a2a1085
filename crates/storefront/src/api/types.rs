//! Domain types for the catalog API.
//!
//! The backend serves Mongo-shaped JSON: `_id` keys, optional fields
//! everywhere, text that may be plain or `{ua, en}`. These types are the
//! tolerant client-side representations; anything messier (populated-or-id
//! references, multi-shape list responses) goes through
//! [`super::conversions`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use meblihub_core::{
    CategoryId, LocalizedText, LocationId, LocationKind, OrderStatus, ProductId, UserId,
};

// =============================================================================
// Products
// =============================================================================

/// Structured specification block on a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Specifications {
    /// Material key (translation key, e.g. `oak`).
    pub material_key: Option<String>,
    /// Manufacturer name or key.
    pub manufacturer: Option<String>,
    /// Bed size key for bedroom furniture.
    pub bed_size: Option<String>,
    /// Warranty in months.
    pub warranty: Option<i64>,
}

/// A catalog product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: LocalizedText,
    pub description: LocalizedText,
    /// Base price in hryvnias (may arrive fractional; use [`Self::base_price`]).
    pub price: Option<f64>,
    /// Discount percentage.
    pub discount: Option<f64>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub type_key: Option<String>,
    pub sku: Option<String>,
    /// Primary image path or URL.
    pub image: Option<String>,
    /// Gallery image paths.
    pub images: Vec<String>,
    /// GLTF model path, when the product has a 3D view.
    pub model_url: Option<String>,
    pub in_stock: Option<bool>,
    /// Dimensions in centimeters.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    pub specifications: Specifications,
    /// Facet keys attached to the product.
    pub color_keys: Vec<String>,
    pub style_keys: Vec<String>,
    pub room_keys: Vec<String>,
    pub collection_keys: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Rounded whole-hryvnia base price; absent or negative prices read as 0.
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

    /// Discount percentage as a whole number, 0 when absent or invalid.
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

    /// Whether a real discount applies (positive percentage up to 100 and a
    /// positive price).
    #[must_use]
    pub fn has_discount(&self) -> bool {
        let pct = self.discount_pct();
        pct > 0 && pct <= 100 && self.base_price() > 0
    }

    /// Final price after discount, rounded.
    #[must_use]
    pub fn final_price(&self) -> i64 {
        meblihub_core::apply_discount(self.base_price(), self.discount_pct())
    }

    /// Best image path (first gallery image, then the legacy single field).
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(String::as_str)
            .or(self.image.as_deref())
    }

    /// Whether the product has a 3D model attached.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

// =============================================================================
// Categories
// =============================================================================

/// A subcategory entry nested in a category document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Subcategory {
    pub key: String,
    pub names: Option<LocalizedText>,
}

/// A catalog category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    /// Stable category key used in URLs and filter params.
    pub category: String,
    /// Legacy single-language name.
    pub name: Option<String>,
    /// Localized names.
    pub names: Option<LocalizedText>,
    pub image: Option<String>,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    /// Localized display label: names -> legacy name -> key.
    #[must_use]
    pub fn label(&self, lang: meblihub_core::Lang) -> String {
        if let Some(names) = &self.names {
            let picked = names.pick(lang);
            if !picked.is_empty() {
                return picked;
            }
        }
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.category.clone())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One raw cart entry as served by `GET /api/cart/`.
///
/// `product` is either a populated product document or a bare id string;
/// [`crate::cart`] resolves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(default)]
    pub product: serde_json::Value,
    #[serde(default)]
    pub qty: Option<f64>,
}

/// Server cart payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CartPayload {
    pub items: Vec<CartEntry>,
}

// =============================================================================
// Users & auth
// =============================================================================

/// A site user, as returned by `/api/auth/me` and login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub banned: Option<bool>,
}

impl User {
    /// Whether this user may open the admin panel.
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

/// Login/register response: a bearer token plus the user document.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Orders
// =============================================================================

/// Customer block of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderCustomer {
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

/// Delivery block of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDelivery {
    pub city: String,
    pub method: String,
    pub pickup_location_id: String,
    pub address: String,
    pub np_office: String,
}

/// One ordered line, denormalized at checkout time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub qty: u32,
    /// Discounted unit price at order time.
    pub price: i64,
    pub sku: String,
    pub image: String,
}

/// Totals block of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub total_savings: i64,
    pub cart_total: i64,
}

/// Payload for `POST /api/orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer: OrderCustomer,
    pub delivery: OrderDelivery,
    pub comment: String,
    pub items: Vec<OrderItem>,
    pub totals: OrderTotals,
}

/// An order document from `GET /api/orders/my`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: meblihub_core::OrderId,
    /// Raw status string; tolerant of values this client does not know.
    pub status: Option<String>,
    pub customer: OrderCustomer,
    pub delivery: OrderDelivery,
    pub comment: Option<String>,
    pub items: Vec<OrderItem>,
    pub totals: OrderTotals,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Parsed status; unknown strings read as [`OrderStatus::New`].
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// A single product review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: meblihub_core::ReviewId,
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Normalized review aggregate for a product.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReviewSummary {
    /// Average rating rounded to one decimal.
    pub avg_rating: f64,
    /// Total review count.
    pub count: i64,
}

// =============================================================================
// Locations
// =============================================================================

/// A physical company location (shop, office, warehouse).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    #[serde(rename = "_id", alias = "id")]
    pub id: LocationId,
    pub city: Option<String>,
    /// Raw kind string; tolerant of values this client does not know.
    #[serde(rename = "type")]
    pub location_type: Option<String>,
    pub name_key: Option<String>,
    pub address_key: Option<String>,
    pub phone: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Location {
    /// Parsed location kind, when recognized.
    #[must_use]
    pub fn kind(&self) -> Option<LocationKind> {
        match self.location_type.as_deref()?.trim().to_lowercase().as_str() {
            "shop" => Some(LocationKind::Shop),
            "office" => Some(LocationKind::Office),
            "warehouse" => Some(LocationKind::Warehouse),
            _ => None,
        }
    }

    /// Whether orders can be picked up here.
    #[must_use]
    pub fn is_pickup_point(&self) -> bool {
        self.kind().is_some_and(LocationKind::is_pickup_point)
    }

    /// Google Maps link for the coordinates, when both are finite.
    #[must_use]
    pub fn map_link(&self) -> Option<String> {
        let lat = self.lat.filter(|v| v.is_finite())?;
        let lng = self.lng.filter(|v| v.is_finite())?;
        Some(format!("https://www.google.com/maps?q={lat},{lng}"))
    }
}

// =============================================================================
// Chat
// =============================================================================

/// A chat message between a customer (or guest) and the support admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatMessage {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<meblihub_core::MessageId>,
    pub sender: String,
    pub receiver: String,
    pub text: String,
    pub is_guest: Option<bool>,
    pub read: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
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
    use meblihub_core::Lang;

    #[test]
    fn test_product_price_helpers() {
        let product: Product = serde_json::from_str(
            r#"{"_id": "p1", "name": {"ua": "Диван", "en": "Sofa"}, "price": 11999.6, "discount": 15.9}"#,
        )
        .expect("parse");

        assert_eq!(product.base_price(), 12000);
        assert_eq!(product.discount_pct(), 15);
        assert!(product.has_discount());
        assert_eq!(product.final_price(), 10200);
    }

    #[test]
    fn test_product_defaults() {
        let product: Product = serde_json::from_str(r#"{"_id": "p2"}"#).expect("parse");
        assert_eq!(product.base_price(), 0);
        assert_eq!(product.discount_pct(), 0);
        assert!(!product.has_discount());
        assert!(!product.has_model());
        assert!(product.primary_image().is_none());
    }

    #[test]
    fn test_product_primary_image_prefers_gallery() {
        let product: Product = serde_json::from_str(
            r#"{"_id": "p3", "image": "/uploads/legacy.jpg", "images": ["/uploads/a.jpg", "/uploads/b.jpg"]}"#,
        )
        .expect("parse");
        assert_eq!(product.primary_image(), Some("/uploads/a.jpg"));
    }

    #[test]
    fn test_category_label_fallbacks() {
        let full: Category = serde_json::from_str(
            r#"{"_id": "c1", "category": "sofas", "names": {"ua": "Дивани", "en": "Sofas"}}"#,
        )
        .expect("parse");
        assert_eq!(full.label(Lang::En), "Sofas");

        let legacy: Category =
            serde_json::from_str(r#"{"_id": "c2", "category": "tables", "name": "Столи"}"#)
                .expect("parse");
        assert_eq!(legacy.label(Lang::Ua), "Столи");

        let bare: Category =
            serde_json::from_str(r#"{"_id": "c3", "category": "chairs"}"#).expect("parse");
        assert_eq!(bare.label(Lang::Ua), "chairs");
    }

    #[test]
    fn test_order_status_tolerant() {
        let order: Order =
            serde_json::from_str(r#"{"_id": "o1", "status": "shipped"}"#).expect("parse");
        assert_eq!(order.status(), OrderStatus::Shipped);

        let unknown: Order =
            serde_json::from_str(r#"{"_id": "o2", "status": "weird"}"#).expect("parse");
        assert_eq!(unknown.status(), OrderStatus::New);
    }

    #[test]
    fn test_location_helpers() {
        let location: Location = serde_json::from_str(
            r#"{"_id": "l1", "city": "Київ", "type": "shop", "lat": 50.45, "lng": 30.52}"#,
        )
        .expect("parse");
        assert!(location.is_pickup_point());
        assert_eq!(
            location.map_link().expect("link"),
            "https://www.google.com/maps?q=50.45,30.52"
        );

        let warehouse: Location =
            serde_json::from_str(r#"{"_id": "l2", "type": "warehouse"}"#).expect("parse");
        assert!(!warehouse.is_pickup_point());
        assert!(warehouse.map_link().is_none());
    }

    #[test]
    fn test_order_payload_wire_format() {
        let payload = OrderPayload {
            customer: OrderCustomer {
                full_name: "Іван Петренко".to_owned(),
                phone: "+380671234567".to_owned(),
                email: String::new(),
            },
            delivery: OrderDelivery {
                city: "Київ".to_owned(),
                method: "nova_poshta".to_owned(),
                pickup_location_id: String::new(),
                address: String::new(),
                np_office: "Відділення 12".to_owned(),
            },
            comment: String::new(),
            items: vec![OrderItem {
                product_id: ProductId::new("p1"),
                name: "Диван".to_owned(),
                qty: 2,
                price: 10200,
                sku: "SF-100".to_owned(),
                image: "http://localhost:5000/uploads/a.jpg".to_owned(),
            }],
            totals: OrderTotals {
                subtotal: 24000,
                total_savings: 3600,
                cart_total: 20400,
            },
        };

        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["customer"]["fullName"], "Іван Петренко");
        assert_eq!(json["delivery"]["npOffice"], "Відділення 12");
        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["totals"]["totalSavings"], 3600);
    }
}
