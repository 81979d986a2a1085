//! Product page: gallery, price block, specifications, reviews, related.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use meblihub_core::{Lang, ProductId, format_uah};

use super::{ProductCardView, resolve_currency, resolve_lang};
use crate::api::conversions::resolve_image_url;
use crate::api::types::{Product, Review, ReviewSummary};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::services::translations::lookup_keyed;
use crate::state::AppState;

/// Related products shown under the page.
const RELATED_COUNT: usize = 4;

/// Reviews fetched for the first page.
const REVIEWS_PAGE_SIZE: u32 = 10;

/// One specification row.
#[derive(Debug, Clone)]
pub struct SpecRow {
    pub label: String,
    pub value: String,
}

/// One displayed review.
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub author: String,
    pub rating: String,
    pub text: String,
}

/// Product page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductPageTemplate {
    pub title: String,
    pub description: String,
    pub sku: String,
    pub images: Vec<String>,
    pub price: String,
    /// Price converted to the visitor's display currency, when not UAH.
    pub price_alt: Option<String>,
    pub old_price: Option<String>,
    pub discount_badge: Option<String>,
    pub in_stock: bool,
    pub has_model: bool,
    pub specs: Vec<SpecRow>,
    pub rating: Option<String>,
    pub review_count: i64,
    pub reviews: Vec<ReviewView>,
    pub related: Vec<ProductCardView>,
    pub product_id: String,
    pub logged_in: bool,
}

fn format_dimension(value: Option<f64>, unit: &str) -> Option<String> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| format!("{v} {unit}"))
}

/// Specification rows, with facet keys resolved through the translation tree.
fn spec_rows(product: &Product, translations: &serde_json::Value) -> Vec<SpecRow> {
    let mut rows = Vec::new();

    let mut push = |key: &str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            rows.push(SpecRow {
                label: lookup_keyed(translations, "specs", key),
                value,
            });
        }
    };

    push("width", format_dimension(product.width, "см"));
    push("height", format_dimension(product.height, "см"));
    push("depth", format_dimension(product.depth, "см"));
    push("weight", format_dimension(product.weight, "кг"));

    let specs = &product.specifications;
    push(
        "material",
        specs
            .material_key
            .as_deref()
            .map(|key| lookup_keyed(translations, "materials", key)),
    );
    push("manufacturer", specs.manufacturer.clone());
    push(
        "bedSize",
        specs
            .bed_size
            .as_deref()
            .map(|key| lookup_keyed(translations, "bedSizes", key)),
    );
    push(
        "warranty",
        specs.warranty.filter(|m| *m > 0).map(|m| format!("{m} міс.")),
    );

    rows
}

fn review_views(reviews: &[Review]) -> Vec<ReviewView> {
    reviews
        .iter()
        .map(|r| ReviewView {
            author: r.author.clone().unwrap_or_else(|| "Покупець".to_owned()),
            rating: r
                .rating
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| format!("{v:.0}/5"))
                .unwrap_or_default(),
            text: r.text.clone().unwrap_or_default(),
        })
        .collect()
}

fn rating_label(summary: ReviewSummary) -> Option<String> {
    (summary.count > 0).then(|| format!("{:.1}", summary.avg_rating))
}

/// `GET /catalog/{category}/{sub}/{id}` - product page.
#[instrument(skip_all, fields(product_id = %path.2))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Path(path): Path<(String, String, String)>,
) -> Result<ProductPageTemplate> {
    let (_, _, id) = path;
    let id = ProductId::new(id);
    let lang = resolve_lang(&session).await;
    let currency = resolve_currency(&session).await;
    let origin = state.api().origin();

    let product = state.api().get_product(&id).await?;

    // Reviews and related products are decoration; their failures must not
    // take the page down
    let (reviews, summary) = state
        .api()
        .get_reviews(&id, 1, REVIEWS_PAGE_SIZE)
        .await
        .unwrap_or_default();
    let translations = state
        .api()
        .get_translations(lang)
        .await
        .unwrap_or(serde_json::Value::Null);
    let related = related_products(&state, &product, lang).await;

    let images: Vec<String> = if product.images.is_empty() {
        vec![product.image.as_deref().map_or_else(
            || crate::api::conversions::PLACEHOLDER_IMAGE.to_owned(),
            |raw| resolve_image_url(origin, raw),
        )]
    } else {
        product
            .images
            .iter()
            .map(|raw| resolve_image_url(origin, raw))
            .collect()
    };

    let price_alt = if currency == "UAH" {
        None
    } else {
        let converted = state.rates().convert(product.final_price(), &currency).await;
        Some(crate::services::currency::format_money(converted, &currency))
    };

    let discounted = product.has_discount();
    Ok(ProductPageTemplate {
        title: product.name.pick(lang),
        description: product.description.pick(lang),
        sku: product.sku.clone().unwrap_or_default(),
        images,
        price: format_uah(product.final_price()),
        price_alt,
        old_price: discounted.then(|| format_uah(product.base_price())),
        discount_badge: discounted.then(|| format!("-{}%", product.discount_pct())),
        in_stock: product.in_stock.unwrap_or(true),
        has_model: product.has_model(),
        specs: spec_rows(&product, &translations),
        rating: rating_label(summary),
        review_count: summary.count,
        reviews: review_views(&reviews),
        related,
        product_id: product.id.as_str().to_owned(),
        logged_in: current.is_some(),
    })
}

/// Products from the same category, excluding the current one.
async fn related_products(state: &AppState, product: &Product, lang: Lang) -> Vec<ProductCardView> {
    let Some(category) = product.category.as_deref() else {
        return Vec::new();
    };

    let params = vec![("category".to_owned(), category.to_owned())];
    let Ok(products) = state.api().filter_products(&params).await else {
        return Vec::new();
    };

    let liked: Vec<String> = Vec::new();
    products
        .iter()
        .filter(|p| p.id != product.id)
        .take(RELATED_COUNT)
        .map(|p| ProductCardView::from_product(p, state.api().origin(), lang, &liked))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_rows_skip_missing() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "width": 220.0,
            "height": 90.0,
            "specifications": {"materialKey": "oak", "warranty": 24},
        }))
        .expect("fixture");

        let translations = json!({"materials": {"oak": "Дуб"}});
        let rows = spec_rows(&product, &translations);

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["width", "height", "material", "warranty"]);

        let material = rows.iter().find(|r| r.label == "material").expect("row");
        assert_eq!(material.value, "Дуб");
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(
            rating_label(ReviewSummary {
                avg_rating: 4.56,
                count: 12
            }),
            Some("4.6".to_owned())
        );
        assert_eq!(rating_label(ReviewSummary::default()), None);
    }
}
