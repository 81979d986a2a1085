//! Home page: popular categories plus newest/discounted product tabs.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use meblihub_core::Lang;

use super::{ProductCardView, resolve_lang};
use crate::api::conversions::resolve_image_url;
use crate::api::types::{Category, Product};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Products shown per home tab.
const TAB_SIZE: usize = 8;

/// Category tile on the home page.
#[derive(Debug, Clone)]
pub struct CategoryCardView {
    pub key: String,
    pub label: String,
    pub href: String,
    pub image: String,
}

impl CategoryCardView {
    fn from_category(category: &Category, origin: &str, lang: Lang) -> Self {
        Self {
            key: category.category.clone(),
            label: category.label(lang),
            href: format!("/catalog/{}", urlencoding::encode(&category.category)),
            image: category.image.as_deref().map_or_else(
                || crate::api::conversions::PLACEHOLDER_IMAGE.to_owned(),
                |raw| resolve_image_url(origin, raw),
            ),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: Vec<CategoryCardView>,
    pub newest: Vec<ProductCardView>,
    pub discounted: Vec<ProductCardView>,
    pub logged_in: bool,
}

/// Newest products first (undated rows sink to the end).
fn newest_first(products: &[Product]) -> Vec<&Product> {
    let mut sorted: Vec<&Product> = products.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Display home page.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
) -> Result<HomeTemplate> {
    let lang = resolve_lang(&session).await;
    let origin = state.api().origin();

    let categories = state.api().get_categories().await.unwrap_or_default();
    let products = state.api().get_products().await.unwrap_or_default();

    let liked: Vec<String> = Vec::new();

    let newest = newest_first(&products)
        .into_iter()
        .take(TAB_SIZE)
        .map(|p| ProductCardView::from_product(p, origin, lang, &liked))
        .collect();

    let discounted = products
        .iter()
        .filter(|p| p.has_discount())
        .take(TAB_SIZE)
        .map(|p| ProductCardView::from_product(p, origin, lang, &liked))
        .collect();

    Ok(HomeTemplate {
        categories: categories
            .iter()
            .map(|c| CategoryCardView::from_category(c, origin, lang))
            .collect(),
        newest,
        discounted,
        logged_in: current.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_sorts_dated_before_undated() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[
                {"_id": "old", "createdAt": "2025-01-01T00:00:00Z"},
                {"_id": "undated"},
                {"_id": "new", "createdAt": "2026-06-01T00:00:00Z"}
            ]"#,
        )
        .expect("fixture");

        let sorted = newest_first(&products);
        let ids: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "undated"]);
    }
}
