//! Normalization of loosely-shaped API responses.
//!
//! The backend has grown several response formats over time; these helpers
//! accept every shape the old clients were observed to handle and reduce them
//! to one.

use serde_json::Value;

use super::types::{Review, ReviewSummary};

/// Path served for products with no usable image.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.svg";

/// Extract an entity id from any of the shapes the backend emits:
/// a bare string or number, `{"$oid": ...}`, or a document with `_id`/`id`.
#[must_use]
pub fn extract_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => {
            if let Some(Value::String(oid)) = map.get("$oid") {
                return oid.clone();
            }
            if let Some(inner) = map.get("_id") {
                return extract_id(inner);
            }
            if let Some(inner) = map.get("id") {
                return extract_id(inner);
            }
            String::new()
        }
        _ => String::new(),
    }
}

/// Extract the product id referenced by a like entry.
///
/// Entries may be bare ids, `{productId}`, or populated `{product: {...}}`.
#[must_use]
pub fn extract_liked_product_id(like: &Value) -> String {
    match like {
        Value::String(_) | Value::Number(_) => extract_id(like),
        Value::Object(map) => {
            if let Some(product_id) = map.get("productId") {
                return extract_id(product_id);
            }
            if let Some(product) = map.get("product") {
                return extract_id(product);
            }
            String::new()
        }
        _ => String::new(),
    }
}

/// Normalize a likes response into a list of product ids.
///
/// Accepts a bare array, `{likes: [...]}`, or `{user: {likes: [...]}}`.
#[must_use]
pub fn normalize_likes(data: &Value) -> Vec<String> {
    let list = if let Some(arr) = data.as_array() {
        arr
    } else if let Some(arr) = data.get("likes").and_then(Value::as_array) {
        arr
    } else if let Some(arr) = data
        .get("user")
        .and_then(|u| u.get("likes"))
        .and_then(Value::as_array)
    {
        arr
    } else {
        return Vec::new();
    };

    list.iter()
        .map(extract_liked_product_id)
        .filter(|id| !id.is_empty())
        .collect()
}

/// Read a numeric field tolerantly (number or numeric string).
fn to_num(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Normalize a reviews response into `(items, summary)`.
///
/// Items may live under `items`, `reviews`, or `data`; the count under any of
/// `count`/`total`/`totalCount`/`totalReviews` (falling back to the item
/// count); the average under `avgRating`/`averageRating`/`avg` (falling back
/// to the computed mean, rounded to one decimal).
#[must_use]
pub fn normalize_reviews(raw: &Value) -> (Vec<Review>, ReviewSummary) {
    let items_value = raw
        .get("items")
        .or_else(|| raw.get("reviews"))
        .or_else(|| raw.get("data"))
        .cloned()
        .unwrap_or(Value::Array(Vec::new()));

    let items: Vec<Review> = serde_json::from_value(items_value).unwrap_or_default();

    let count_fields = ["count", "total", "totalCount", "totalReviews"];
    #[allow(clippy::cast_possible_truncation)]
    let mut count = count_fields
        .iter()
        .map(|key| to_num(raw.get(*key)) as i64)
        .find(|n| *n > 0)
        .unwrap_or(0);
    if count == 0 {
        count = items.len() as i64;
    }

    let avg_fields = ["avgRating", "averageRating", "avg"];
    let mut avg = avg_fields
        .iter()
        .map(|key| to_num(raw.get(*key)))
        .find(|n| *n > 0.0)
        .unwrap_or(0.0);
    if avg == 0.0 {
        avg = mean_rating(&items);
    }

    (items, ReviewSummary {
        avg_rating: avg,
        count,
    })
}

/// Mean of item ratings, rounded to one decimal; 0 for an empty list.
fn mean_rating(items: &[Review]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let sum: f64 = items
        .iter()
        .map(|r| r.rating.filter(|v| v.is_finite()).unwrap_or(0.0))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / items.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Resolve an image path against the API origin.
///
/// Absolute `http(s)`/`data:`/`blob:` URLs pass through; server-relative
/// paths are joined to the origin; empty input yields the placeholder.
#[must_use]
pub fn resolve_image_url(origin: &str, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER_IMAGE.to_owned();
    }

    let lower = trimmed.to_lowercase();
    if lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
        || lower.starts_with("blob:")
    {
        return trimmed.to_owned();
    }

    let origin = origin.trim_end_matches('/');
    if trimmed.starts_with('/') {
        format!("{origin}{trimmed}")
    } else {
        format!("{origin}/{trimmed}")
    }
}

/// Catalog URL for a product: `/catalog/{category}/{subcategory}/{id}`,
/// with `all`/`product` standing in for missing segments.
#[must_use]
pub fn product_href(category: Option<&str>, sub_category: Option<&str>, id: &str) -> String {
    if id.is_empty() {
        return "/catalog".to_owned();
    }
    let category = category.filter(|c| !c.is_empty()).unwrap_or("all");
    let sub = sub_category.filter(|s| !s.is_empty()).unwrap_or("product");
    format!(
        "/catalog/{}/{}/{}",
        urlencoding::encode(category),
        urlencoding::encode(sub),
        urlencoding::encode(id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_id_shapes() {
        assert_eq!(extract_id(&json!("abc")), "abc");
        assert_eq!(extract_id(&json!(42)), "42");
        assert_eq!(extract_id(&json!({"$oid": "deadbeef"})), "deadbeef");
        assert_eq!(extract_id(&json!({"_id": "x1"})), "x1");
        assert_eq!(extract_id(&json!({"_id": {"$oid": "x2"}})), "x2");
        assert_eq!(extract_id(&json!({"id": "x3"})), "x3");
        assert_eq!(extract_id(&json!(null)), "");
        assert_eq!(extract_id(&json!({})), "");
    }

    #[test]
    fn test_normalize_likes_shapes() {
        let bare = json!(["p1", {"productId": "p2"}, {"product": {"_id": "p3"}}]);
        assert_eq!(normalize_likes(&bare), vec!["p1", "p2", "p3"]);

        let wrapped = json!({"likes": [{"productId": "p4"}]});
        assert_eq!(normalize_likes(&wrapped), vec!["p4"]);

        let nested = json!({"user": {"likes": ["p5"]}});
        assert_eq!(normalize_likes(&nested), vec!["p5"]);

        assert!(normalize_likes(&json!({"unrelated": true})).is_empty());
        assert!(normalize_likes(&json!(null)).is_empty());
    }

    #[test]
    fn test_normalize_likes_drops_empty_entries() {
        let data = json!([{"product": {}}, "", "p1"]);
        assert_eq!(normalize_likes(&data), vec!["p1"]);
    }

    #[test]
    fn test_normalize_reviews_explicit_aggregate() {
        let raw = json!({
            "items": [{"_id": "r1", "rating": 5}, {"_id": "r2", "rating": 4}],
            "total": 27,
            "avgRating": 4.6,
        });
        let (items, summary) = normalize_reviews(&raw);
        assert_eq!(items.len(), 2);
        assert_eq!(summary.count, 27);
        assert!((summary.avg_rating - 4.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_reviews_computed_aggregate() {
        let raw = json!({
            "reviews": [{"_id": "r1", "rating": 5}, {"_id": "r2", "rating": 4}, {"_id": "r3", "rating": 3}],
        });
        let (items, summary) = normalize_reviews(&raw);
        assert_eq!(items.len(), 3);
        assert_eq!(summary.count, 3);
        assert!((summary.avg_rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_reviews_empty() {
        let (items, summary) = normalize_reviews(&json!({}));
        assert!(items.is_empty());
        assert_eq!(summary, ReviewSummary::default());
    }

    #[test]
    fn test_resolve_image_url() {
        let origin = "http://localhost:5000";
        assert_eq!(
            resolve_image_url(origin, "/uploads/sofa.jpg"),
            "http://localhost:5000/uploads/sofa.jpg"
        );
        assert_eq!(
            resolve_image_url(origin, "uploads/sofa.jpg"),
            "http://localhost:5000/uploads/sofa.jpg"
        );
        assert_eq!(
            resolve_image_url(origin, "https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(resolve_image_url(origin, "  "), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_product_href() {
        assert_eq!(
            product_href(Some("sofas"), Some("corner"), "p1"),
            "/catalog/sofas/corner/p1"
        );
        assert_eq!(product_href(None, None, "p1"), "/catalog/all/product/p1");
        assert_eq!(product_href(Some("sofas"), None, ""), "/catalog");
    }
}
