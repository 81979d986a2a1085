//! Cart pricing.
//!
//! The backend stores only `(product, qty)` pairs; every displayed number -
//! discounted unit price, per-line totals, savings, cart totals - is derived
//! here, from the server payload, on every render. Lines whose product
//! reference cannot be resolved are dropped rather than shown broken.

use serde_json::Value;

use meblihub_core::{Lang, ProductId};

use crate::api::conversions::{extract_id, product_href, resolve_image_url};
use crate::api::types::{CartPayload, Product};

/// Fallback product name when the document carries none.
const FALLBACK_NAME: &str = "Товар";

/// Clamp a raw quantity: floor, at least 1.
#[must_use]
pub fn clamp_qty(raw: Option<f64>) -> u32 {
    let n = raw.filter(|v| v.is_finite()).unwrap_or(1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (n.floor().max(1.0) as u32).max(1)
    }
}

/// Clamp a raw discount percentage: floor, into `[0, 99]`.
///
/// Cart lines cap at 99%, unlike the product-page badge which allows 100.
#[must_use]
pub fn clamp_pct(raw: Option<f64>) -> i64 {
    let n = raw.filter(|v| v.is_finite()).unwrap_or(0.0);
    #[allow(clippy::cast_possible_truncation)]
    {
        (n.floor() as i64).clamp(0, 99)
    }
}

/// Final unit price for a base price and clamped discount percentage.
#[must_use]
pub fn calc_final_price(base_price: i64, discount_pct: i64) -> i64 {
    if base_price <= 0 {
        return 0;
    }
    let pct = discount_pct.clamp(0, 99);
    if pct == 0 {
        return base_price;
    }
    // round(base * (1 - pct/100)), floored at zero
    ((base_price * (100 - pct) + 50) / 100).max(0)
}

/// One cart line with all derived prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub qty: u32,
    pub name: String,
    pub sku: String,
    pub image_src: String,
    pub href: String,
    /// Rounded base unit price.
    pub base_price: i64,
    /// Clamped discount percentage.
    pub discount_pct: i64,
    /// Discounted unit price.
    pub final_price: i64,
    /// Struck-through price; 0 when there is no discount.
    pub old_price: i64,
    pub unit_savings: i64,
    pub line_total: i64,
    pub line_savings: i64,
}

/// A fully priced cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    /// Sum of quantities.
    pub total_items: u32,
    /// Sum of undiscounted line prices.
    pub subtotal: i64,
    /// Sum of discounted line prices (what the customer pays).
    pub cart_total: i64,
    /// `max(0, subtotal - cart_total)`.
    pub total_savings: i64,
}

impl PricedCart {
    /// Whether the cart has no resolvable lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Price a server cart payload.
    ///
    /// `origin` resolves relative image paths; `lang` picks display names.
    #[must_use]
    pub fn from_payload(payload: &CartPayload, origin: &str, lang: Lang) -> Self {
        let lines: Vec<PricedLine> = payload
            .items
            .iter()
            .filter_map(|entry| price_entry(&entry.product, entry.qty, origin, lang))
            .collect();

        let total_items = lines.iter().map(|l| l.qty).sum();
        let subtotal = lines
            .iter()
            .map(|l| l.base_price * i64::from(l.qty))
            .sum::<i64>();
        let cart_total = lines.iter().map(|l| l.line_total).sum::<i64>();
        let total_savings = (subtotal - cart_total).max(0);

        Self {
            lines,
            total_items,
            subtotal,
            cart_total,
            total_savings,
        }
    }
}

/// Price one raw entry; `None` when no product id can be resolved.
fn price_entry(product: &Value, qty: Option<f64>, origin: &str, lang: Lang) -> Option<PricedLine> {
    let populated: Option<Product> = product
        .as_object()
        .and_then(|_| serde_json::from_value(product.clone()).ok());

    let product_id = populated
        .as_ref()
        .map_or_else(|| extract_id(product), |p| p.id.as_str().to_owned());
    if product_id.is_empty() {
        return None;
    }

    let qty = clamp_qty(qty);

    let (base_price, discount_pct, name, sku, image_src, href) = match &populated {
        Some(p) => {
            let name = {
                let picked = p.name.pick(lang);
                if picked.is_empty() {
                    FALLBACK_NAME.to_owned()
                } else {
                    picked
                }
            };
            let image = p
                .primary_image()
                .map_or_else(
                    || crate::api::conversions::PLACEHOLDER_IMAGE.to_owned(),
                    |raw| resolve_image_url(origin, raw),
                );
            (
                p.base_price(),
                clamp_pct(p.discount),
                name,
                p.sku.clone().unwrap_or_default(),
                image,
                product_href(p.category.as_deref(), p.sub_category.as_deref(), &product_id),
            )
        }
        None => (
            0,
            0,
            FALLBACK_NAME.to_owned(),
            String::new(),
            crate::api::conversions::PLACEHOLDER_IMAGE.to_owned(),
            product_href(None, None, &product_id),
        ),
    };

    let final_price = calc_final_price(base_price, discount_pct);
    let old_price = if discount_pct > 0 { base_price } else { 0 };
    let unit_savings = if discount_pct > 0 {
        (base_price - final_price).max(0)
    } else {
        0
    };

    Some(PricedLine {
        product_id: ProductId::new(product_id),
        qty,
        name,
        sku,
        image_src,
        href,
        base_price,
        discount_pct,
        final_price,
        old_price,
        unit_savings,
        line_total: final_price * i64::from(qty),
        line_savings: unit_savings * i64::from(qty),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> CartPayload {
        serde_json::from_value(value).expect("cart fixture")
    }

    #[test]
    fn test_clamp_qty() {
        assert_eq!(clamp_qty(Some(3.0)), 3);
        assert_eq!(clamp_qty(Some(2.9)), 2);
        assert_eq!(clamp_qty(Some(0.0)), 1);
        assert_eq!(clamp_qty(Some(-4.0)), 1);
        assert_eq!(clamp_qty(None), 1);
        assert_eq!(clamp_qty(Some(f64::NAN)), 1);
    }

    #[test]
    fn test_clamp_pct() {
        assert_eq!(clamp_pct(Some(15.0)), 15);
        assert_eq!(clamp_pct(Some(15.9)), 15);
        assert_eq!(clamp_pct(Some(100.0)), 99);
        assert_eq!(clamp_pct(Some(-3.0)), 0);
        assert_eq!(clamp_pct(None), 0);
    }

    #[test]
    fn test_calc_final_price() {
        assert_eq!(calc_final_price(1000, 15), 850);
        assert_eq!(calc_final_price(999, 10), 899);
        assert_eq!(calc_final_price(995, 10), 896); // half-up
        assert_eq!(calc_final_price(1000, 0), 1000);
        assert_eq!(calc_final_price(0, 50), 0);
        assert_eq!(calc_final_price(100, 99), 1);
    }

    #[test]
    fn test_priced_cart_populated_line() {
        let cart = payload(json!({
            "items": [{
                "product": {
                    "_id": "p1",
                    "name": {"ua": "Диван", "en": "Sofa"},
                    "price": 12000,
                    "discount": 15,
                    "sku": "SF-100",
                    "category": "sofas",
                    "subCategory": "corner",
                    "images": ["/uploads/a.jpg"],
                },
                "qty": 2,
            }]
        }));

        let priced = PricedCart::from_payload(&cart, "http://localhost:5000", Lang::Ua);
        assert_eq!(priced.lines.len(), 1);

        let line = priced.lines.first().expect("line");
        assert_eq!(line.name, "Диван");
        assert_eq!(line.base_price, 12000);
        assert_eq!(line.final_price, 10200);
        assert_eq!(line.old_price, 12000);
        assert_eq!(line.unit_savings, 1800);
        assert_eq!(line.line_total, 20400);
        assert_eq!(line.line_savings, 3600);
        assert_eq!(line.image_src, "http://localhost:5000/uploads/a.jpg");
        assert_eq!(line.href, "/catalog/sofas/corner/p1");

        assert_eq!(priced.total_items, 2);
        assert_eq!(priced.subtotal, 24000);
        assert_eq!(priced.cart_total, 20400);
        assert_eq!(priced.total_savings, 3600);
    }

    #[test]
    fn test_priced_cart_bare_id_line() {
        let cart = payload(json!({"items": [{"product": "p9", "qty": 1}]}));
        let priced = PricedCart::from_payload(&cart, "http://localhost:5000", Lang::Ua);

        let line = priced.lines.first().expect("line");
        assert_eq!(line.product_id.as_str(), "p9");
        assert_eq!(line.name, FALLBACK_NAME);
        assert_eq!(line.base_price, 0);
        assert_eq!(line.href, "/catalog/all/product/p9");
    }

    #[test]
    fn test_priced_cart_drops_unresolvable_lines() {
        let cart = payload(json!({
            "items": [
                {"product": {}, "qty": 1},
                {"product": null, "qty": 2},
                {"product": "p1", "qty": 1},
            ]
        }));
        let priced = PricedCart::from_payload(&cart, "http://localhost:5000", Lang::Ua);
        assert_eq!(priced.lines.len(), 1);
    }

    #[test]
    fn test_totals_identity() {
        let cart = payload(json!({
            "items": [
                {"product": {"_id": "a", "price": 999, "discount": 10}, "qty": 3},
                {"product": {"_id": "b", "price": 5000}, "qty": 1},
            ]
        }));
        let priced = PricedCart::from_payload(&cart, "http://localhost:5000", Lang::Ua);

        // Per-line rounding keeps the identity subtotal = cart_total + savings
        assert_eq!(priced.subtotal, priced.cart_total + priced.total_savings);
        assert!(priced.total_savings >= 0);
        assert_eq!(priced.total_items, 4);
    }

    #[test]
    fn test_empty_cart() {
        let priced = PricedCart::from_payload(&CartPayload::default(), "x", Lang::Ua);
        assert!(priced.is_empty());
        assert_eq!(priced.cart_total, 0);
    }
}
