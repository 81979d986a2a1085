//! Checkout: form validation and order placement.
//!
//! The form draft survives in the session between visits; the payload posted
//! to the catalog API denormalizes cart lines at their discounted prices so
//! the order records what the customer actually saw.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_sessions::Session;
use tracing::instrument;

use meblihub_core::{DeliveryMethod, Email, Lang, Phone, format_uah};

use super::resolve_lang;
use crate::api::conversions::extract_id;
use crate::api::types::{OrderCustomer, OrderDelivery, OrderItem, OrderPayload, OrderTotals};
use crate::cart::PricedCart;
use crate::error::Result;
use crate::middleware::{RequireAuth, session_keys};
use crate::state::AppState;

// =============================================================================
// Form & validation
// =============================================================================

/// Raw checkout form as posted (and as drafted in the session).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    /// `pickup` | `courier` | `nova_poshta`
    pub delivery_method: String,
    pub pickup_location_id: String,
    pub address: String,
    pub np_office: String,
    pub comment: String,
    pub agree: Option<String>,
}

impl CheckoutForm {
    fn method(&self) -> DeliveryMethod {
        self.delivery_method.parse().unwrap_or_default()
    }

    fn agreed(&self) -> bool {
        self.agree.is_some()
    }
}

/// Per-field validation errors, localized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutErrors {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub pickup_location_id: Option<String>,
    pub address: Option<String>,
    pub np_office: Option<String>,
    pub agree: Option<String>,
    pub cart: Option<String>,
}

impl CheckoutErrors {
    /// Whether the form passed validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn msg(lang: Lang, en: &str, ua: &str) -> Option<String> {
    Some(match lang {
        Lang::En => en.to_owned(),
        Lang::Ua => ua.to_owned(),
    })
}

/// Validate the checkout form against the current cart.
#[must_use]
pub fn validate(form: &CheckoutForm, cart_empty: bool, lang: Lang) -> CheckoutErrors {
    let mut errors = CheckoutErrors::default();

    if form.full_name.trim().is_empty() {
        errors.full_name = msg(lang, "Enter full name", "Вкажіть ім’я та прізвище");
    }

    if Phone::parse(&form.phone).is_err() {
        errors.phone = msg(
            lang,
            "Enter a valid phone number",
            "Вкажіть коректний номер телефону",
        );
    }

    // Email is optional, validated only when present
    if !form.email.trim().is_empty() && Email::parse(&form.email).is_err() {
        errors.email = msg(lang, "Invalid email format", "Невірний формат email");
    }

    if form.city.trim().is_empty() {
        errors.city = msg(lang, "Choose a city", "Оберіть місто");
    }

    match form.method() {
        DeliveryMethod::Pickup => {
            if form.pickup_location_id.trim().is_empty() {
                errors.pickup_location_id =
                    msg(lang, "Choose pickup point", "Оберіть точку самовивозу");
            }
        }
        DeliveryMethod::Courier => {
            if form.address.trim().is_empty() {
                errors.address = msg(lang, "Enter delivery address", "Вкажіть адресу доставки");
            }
        }
        DeliveryMethod::NovaPoshta => {
            if form.np_office.trim().is_empty() {
                errors.np_office = msg(
                    lang,
                    "Enter Nova Poshta office/locker",
                    "Вкажіть відділення/поштомат Нової Пошти",
                );
            }
        }
    }

    if !form.agreed() {
        errors.agree = msg(
            lang,
            "Consent is required",
            "Потрібна згода на обробку даних",
        );
    }

    if cart_empty {
        errors.cart = msg(lang, "Cart is empty", "Кошик порожній");
    }

    errors
}

/// Build the order payload from a validated form and priced cart.
///
/// Fields irrelevant to the chosen delivery method are sent empty.
#[must_use]
pub fn build_payload(form: &CheckoutForm, cart: &PricedCart) -> OrderPayload {
    let method = form.method();
    let phone = Phone::parse(&form.phone).map_or_else(|_| form.phone.clone(), |p| p.to_string());

    OrderPayload {
        customer: OrderCustomer {
            full_name: form.full_name.trim().to_owned(),
            phone,
            email: form.email.trim().to_owned(),
        },
        delivery: OrderDelivery {
            city: form.city.trim().to_owned(),
            method: method.as_str().to_owned(),
            pickup_location_id: if method == DeliveryMethod::Pickup {
                form.pickup_location_id.trim().to_owned()
            } else {
                String::new()
            },
            address: if method == DeliveryMethod::Courier {
                form.address.trim().to_owned()
            } else {
                String::new()
            },
            np_office: if method == DeliveryMethod::NovaPoshta {
                form.np_office.trim().to_owned()
            } else {
                String::new()
            },
        },
        comment: form.comment.trim().to_owned(),
        items: cart
            .lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                qty: line.qty,
                price: line.final_price,
                sku: line.sku.clone(),
                image: line.image_src.clone(),
            })
            .collect(),
        totals: OrderTotals {
            subtotal: cart.subtotal,
            total_savings: cart.total_savings,
            cart_total: cart.cart_total,
        },
    }
}

/// Order id out of the creation response: `{order: {_id}}`, `{_id}`, or `{id}`.
fn created_order_id(response: &Value) -> String {
    let from_order = response.get("order").map(extract_id).unwrap_or_default();
    if !from_order.is_empty() {
        return from_order;
    }
    extract_id(response)
}

// =============================================================================
// Views
// =============================================================================

/// One selectable pickup point.
#[derive(Debug, Clone)]
pub struct PickupOption {
    pub id: String,
    pub label: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub form: CheckoutForm,
    pub errors: CheckoutErrors,
    pub cities: Vec<String>,
    pub pickup_options: Vec<PickupOption>,
    pub item_count: u32,
    pub subtotal: String,
    pub total_savings: Option<String>,
    pub cart_total: String,
    pub submit_error: String,
    pub logged_in: bool,
}

/// Distinct sorted cities with at least one location.
fn cities(locations: &[crate::api::types::Location]) -> Vec<String> {
    let mut cities: Vec<String> = locations
        .iter()
        .filter_map(|l| l.city.clone())
        .filter(|c| !c.is_empty())
        .collect();
    cities.sort();
    cities.dedup();
    cities
}

/// Pickup points (shops and offices) in the chosen city.
fn pickup_options(
    locations: &[crate::api::types::Location],
    city: &str,
    translations: &Value,
) -> Vec<PickupOption> {
    if city.trim().is_empty() {
        return Vec::new();
    }
    locations
        .iter()
        .filter(|l| l.city.as_deref() == Some(city) && l.is_pickup_point())
        .map(|l| PickupOption {
            id: l.id.as_str().to_owned(),
            label: l.name_key.as_deref().map_or_else(
                || l.id.as_str().to_owned(),
                |key| crate::services::translations::lookup_keyed(translations, "locations", key),
            ),
        })
        .collect()
}

async fn load_draft(session: &Session) -> CheckoutForm {
    session
        .get::<CheckoutForm>(session_keys::CHECKOUT_DRAFT)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn render(
    state: &AppState,
    session: &Session,
    token: &str,
    form: CheckoutForm,
    errors: CheckoutErrors,
    submit_error: String,
) -> Result<CheckoutTemplate> {
    let lang = resolve_lang(session).await;

    let payload = state.api().get_cart(token).await.unwrap_or_default();
    let priced = PricedCart::from_payload(&payload, state.api().origin(), lang);

    let locations = state.api().get_locations().await.unwrap_or_default();
    let translations = state
        .api()
        .get_translations(lang)
        .await
        .unwrap_or(Value::Null);

    Ok(CheckoutTemplate {
        cities: cities(&locations),
        pickup_options: pickup_options(&locations, &form.city, &translations),
        item_count: priced.total_items,
        subtotal: format_uah(priced.subtotal),
        total_savings: (priced.total_savings > 0).then(|| format_uah(priced.total_savings)),
        cart_total: format_uah(priced.cart_total),
        form,
        errors,
        submit_error,
        logged_in: true,
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout form. An empty cart bounces back to the cart page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<Response> {
    let lang = resolve_lang(&session).await;
    let payload = state.api().get_cart(&current.token).await.unwrap_or_default();
    let priced = PricedCart::from_payload(&payload, state.api().origin(), lang);
    if priced.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let draft = load_draft(&session).await;
    let template = render(
        &state,
        &session,
        &current.token,
        draft,
        CheckoutErrors::default(),
        String::new(),
    )
    .await?;
    Ok(template.into_response())
}

/// Place the order.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let lang = resolve_lang(&session).await;

    // Persist the draft before anything can fail
    let _ = session.insert(session_keys::CHECKOUT_DRAFT, &form).await;

    let payload = state.api().get_cart(&current.token).await.unwrap_or_default();
    let priced = PricedCart::from_payload(&payload, state.api().origin(), lang);

    let errors = validate(&form, priced.is_empty(), lang);
    if !errors.is_empty() {
        let template = render(&state, &session, &current.token, form, errors, String::new()).await?;
        return Ok(template.into_response());
    }

    let order_payload = build_payload(&form, &priced);
    match state.api().create_order(&current.token, &order_payload).await {
        Ok(created) => {
            // Best-effort cleanup; the order is already placed
            if let Err(e) = state.api().clear_cart(&current.token).await {
                tracing::warn!("cart clear after order failed: {e}");
            }
            let _ = session
                .remove::<CheckoutForm>(session_keys::CHECKOUT_DRAFT)
                .await;

            let order_id = created_order_id(&created);
            let target = if order_id.is_empty() {
                "/account/orders".to_owned()
            } else {
                format!("/account/orders?order={}", urlencoding::encode(&order_id))
            };
            Ok(Redirect::to(&target).into_response())
        }
        Err(crate::api::ApiError::Unauthorized) => {
            Ok(Redirect::to("/auth/login").into_response())
        }
        Err(e) => {
            tracing::warn!("order placement failed: {e}");
            let submit_error = match lang {
                Lang::En => "Failed to place the order, try again".to_owned(),
                Lang::Ua => "Не вдалося оформити замовлення, спробуйте ще раз".to_owned(),
            };
            let template = render(
                &state,
                &session,
                &current.token,
                form,
                CheckoutErrors::default(),
                submit_error,
            )
            .await?;
            Ok(template.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Іван Петренко".to_owned(),
            phone: "+38 (067) 123-45-67".to_owned(),
            email: String::new(),
            city: "Київ".to_owned(),
            delivery_method: "pickup".to_owned(),
            pickup_location_id: "loc1".to_owned(),
            address: String::new(),
            np_office: String::new(),
            comment: String::new(),
            agree: Some("on".to_owned()),
        }
    }

    fn cart_with_line() -> PricedCart {
        let payload: crate::api::types::CartPayload = serde_json::from_value(json!({
            "items": [{"product": {"_id": "p1", "price": 12000, "discount": 15, "name": "Диван"}, "qty": 2}]
        }))
        .expect("fixture");
        PricedCart::from_payload(&payload, "http://localhost:5000", Lang::Ua)
    }

    #[test]
    fn test_validate_passes_valid_form() {
        assert!(validate(&valid_form(), false, Lang::Ua).is_empty());
    }

    #[test]
    fn test_validate_requires_basics() {
        let form = CheckoutForm::default();
        let errors = validate(&form, true, Lang::Ua);
        assert!(errors.full_name.is_some());
        assert!(errors.phone.is_some());
        assert!(errors.city.is_some());
        assert!(errors.agree.is_some());
        assert!(errors.cart.is_some());
        // Empty email is fine
        assert!(errors.email.is_none());
    }

    #[test]
    fn test_validate_per_delivery_method() {
        let mut form = valid_form();

        form.delivery_method = "courier".to_owned();
        let errors = validate(&form, false, Lang::Ua);
        assert!(errors.address.is_some());
        assert!(errors.pickup_location_id.is_none());

        form.delivery_method = "nova_poshta".to_owned();
        let errors = validate(&form, false, Lang::En);
        assert!(errors.np_office.is_some());

        form.delivery_method = "pickup".to_owned();
        form.pickup_location_id = String::new();
        let errors = validate(&form, false, Lang::Ua);
        assert!(errors.pickup_location_id.is_some());
    }

    #[test]
    fn test_validate_rejects_bad_optional_email() {
        let mut form = valid_form();
        form.email = "not-an-email".to_owned();
        assert!(validate(&form, false, Lang::Ua).email.is_some());
    }

    #[test]
    fn test_build_payload_normalizes_and_scopes_delivery() {
        let mut form = valid_form();
        form.delivery_method = "nova_poshta".to_owned();
        form.np_office = " Відділення 12 ".to_owned();
        form.pickup_location_id = "stale".to_owned();
        form.address = "stale street".to_owned();

        let payload = build_payload(&form, &cart_with_line());

        assert_eq!(payload.customer.phone, "+380671234567");
        assert_eq!(payload.delivery.method, "nova_poshta");
        assert_eq!(payload.delivery.np_office, "Відділення 12");
        // Fields for other methods are cleared
        assert_eq!(payload.delivery.pickup_location_id, "");
        assert_eq!(payload.delivery.address, "");

        // Items carry the discounted unit price
        let item = payload.items.first().expect("item");
        assert_eq!(item.price, 10200);
        assert_eq!(item.qty, 2);
        assert_eq!(payload.totals.cart_total, 20400);
        assert_eq!(payload.totals.total_savings, 3600);
    }

    #[test]
    fn test_created_order_id_shapes() {
        assert_eq!(created_order_id(&json!({"order": {"_id": "o1"}})), "o1");
        assert_eq!(created_order_id(&json!({"_id": "o2"})), "o2");
        assert_eq!(created_order_id(&json!({"id": "o3"})), "o3");
        assert_eq!(created_order_id(&json!({})), "");
    }
}
