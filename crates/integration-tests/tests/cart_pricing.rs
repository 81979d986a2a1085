//! Cart pricing over backend-shaped payloads, end to end into the order
//! payload the storefront would submit.

use serde_json::json;

use meblihub_core::Lang;
use meblihub_storefront::api::types::CartPayload;
use meblihub_storefront::cart::PricedCart;

const ORIGIN: &str = "http://localhost:5000";

fn cart(value: serde_json::Value) -> PricedCart {
    let payload: CartPayload = serde_json::from_value(value).expect("cart payload");
    PricedCart::from_payload(&payload, ORIGIN, Lang::Ua)
}

#[test]
fn test_mixed_cart_totals() {
    let priced = cart(json!({
        "items": [
            {"product": {"_id": "sofa", "name": {"ua": "Диван"}, "price": 18999, "discount": 20,
                         "category": "sofas", "subCategory": "corner", "images": ["/uploads/s.jpg"]},
             "qty": 1},
            {"product": {"_id": "chair", "name": "Стілець", "price": 2400}, "qty": 4},
            {"product": "bare-id-only", "qty": 2},
        ]
    }));

    assert_eq!(priced.lines.len(), 3);
    assert_eq!(priced.total_items, 7);

    // round(18999 * 0.8) = 15199
    let sofa = priced.lines.first().expect("sofa");
    assert_eq!(sofa.final_price, 15199);
    assert_eq!(sofa.line_savings, 3800);
    assert_eq!(sofa.image_src, "http://localhost:5000/uploads/s.jpg");

    assert_eq!(priced.subtotal, 18999 + 4 * 2400);
    assert_eq!(priced.cart_total, 15199 + 4 * 2400);
    assert_eq!(priced.subtotal, priced.cart_total + priced.total_savings);
}

#[test]
fn test_defensive_quantities_and_discounts() {
    let priced = cart(json!({
        "items": [
            {"product": {"_id": "a", "price": 1000, "discount": 150}, "qty": 0},
            {"product": {"_id": "b", "price": 1000, "discount": -5}, "qty": -3},
        ]
    }));

    // Quantities clamp to 1, discounts clamp into [0, 99]
    for line in &priced.lines {
        assert_eq!(line.qty, 1);
    }
    let over = priced.lines.first().expect("line a");
    assert_eq!(over.discount_pct, 99);
    assert_eq!(over.final_price, 10);

    let under = priced.lines.get(1).expect("line b");
    assert_eq!(under.discount_pct, 0);
    assert_eq!(under.final_price, 1000);
}

#[test]
fn test_priced_cart_feeds_the_order_payload() {
    use meblihub_storefront::routes::checkout::{CheckoutForm, build_payload, validate};

    let priced = cart(json!({
        "items": [{"product": {"_id": "sofa", "name": {"ua": "Диван"}, "price": 12000, "discount": 15,
                               "sku": "SF-1"}, "qty": 2}]
    }));

    let form = CheckoutForm {
        full_name: "Іван Петренко".to_owned(),
        phone: "067 123 45 67".to_owned(),
        city: "Київ".to_owned(),
        delivery_method: "courier".to_owned(),
        address: "вул. Хрещатик, 1".to_owned(),
        agree: Some("on".to_owned()),
        ..CheckoutForm::default()
    };

    assert!(validate(&form, priced.is_empty(), Lang::Ua).is_empty());

    let payload = build_payload(&form, &priced);
    let wire = serde_json::to_value(&payload).expect("serialize");

    assert_eq!(wire["items"][0]["price"], 10200);
    assert_eq!(wire["items"][0]["qty"], 2);
    assert_eq!(wire["totals"]["subtotal"], 24000);
    assert_eq!(wire["totals"]["cartTotal"], 20400);
    assert_eq!(wire["delivery"]["method"], "courier");
    assert_eq!(wire["delivery"]["npOffice"], "");
}
