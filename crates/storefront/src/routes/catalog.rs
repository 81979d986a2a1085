//! Catalog listing: filters, facets, pagination.
//!
//! The filter state round-trips through the URL (see
//! [`crate::catalog::filters`]); the backend filter endpoint does the heavy
//! lifting and facets are derived from whatever it returned.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, RawQuery, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use meblihub_core::Lang;

use super::{ProductCardView, resolve_lang};
use crate::catalog::{Facets, ProductFilters, derive_facets, page_count, page_slice};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Pagination query (kept out of [`ProductFilters`]; a filter change resets
/// the page).
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

/// One pagination link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub title: String,
    pub base_path: String,
    pub products: Vec<ProductCardView>,
    pub facets: Facets,
    pub filters: ProductFilters,
    pub chip_count: usize,
    pub total: usize,
    pub pages: Vec<PageLink>,
    pub logged_in: bool,
}

/// Render a catalog listing for the given scope.
#[allow(clippy::too_many_arguments)]
pub async fn render_scoped(
    state: &AppState,
    lang: Lang,
    title: String,
    base_path: String,
    base_params: Vec<(String, String)>,
    filters: ProductFilters,
    page: usize,
    logged_in: bool,
) -> Result<CatalogTemplate> {
    let origin = state.api().origin();

    let products = state
        .api()
        .filter_products(&filters.to_api_params(&base_params))
        .await?;

    let facets = derive_facets(&products);
    let total = products.len();
    let page = page.max(1);

    let liked: Vec<String> = Vec::new();
    let cards: Vec<ProductCardView> = page_slice(&products, page)
        .iter()
        .map(|p| ProductCardView::from_product(p, origin, lang, &liked))
        .collect();

    let query = filters.to_query_string();
    let pages = (1..=page_count(total))
        .map(|number| PageLink {
            number,
            href: format!("{base_path}?{query}&page={number}"),
            current: number == page,
        })
        .collect();

    Ok(CatalogTemplate {
        title,
        base_path,
        products: cards,
        facets,
        chip_count: filters.active_chip_count(),
        filters,
        total,
        pages,
        logged_in,
    })
}

fn parse_filters(raw_query: Option<&str>) -> ProductFilters {
    ProductFilters::from_query_str(raw_query.unwrap_or_default())
}

/// `GET /catalog` - the whole catalog.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Query(page): Query<PageQuery>,
    RawQuery(raw): RawQuery,
) -> Result<CatalogTemplate> {
    let lang = resolve_lang(&session).await;
    render_scoped(
        &state,
        lang,
        "Каталог".to_owned(),
        "/catalog".to_owned(),
        Vec::new(),
        parse_filters(raw.as_deref()),
        page.page.unwrap_or(1),
        current.is_some(),
    )
    .await
}

/// `GET /catalog/{category}`.
#[instrument(skip_all, fields(category = %category))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Path(category): Path<String>,
    Query(page): Query<PageQuery>,
    RawQuery(raw): RawQuery,
) -> Result<CatalogTemplate> {
    let lang = resolve_lang(&session).await;
    let base_params = scope_params(&category, None);
    render_scoped(
        &state,
        lang,
        category.clone(),
        format!("/catalog/{}", urlencoding::encode(&category)),
        base_params,
        parse_filters(raw.as_deref()),
        page.page.unwrap_or(1),
        current.is_some(),
    )
    .await
}

/// `GET /catalog/{category}/{sub}`.
#[instrument(skip_all, fields(category = %path.0, sub = %path.1))]
pub async fn subcategory(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Path(path): Path<(String, String)>,
    Query(page): Query<PageQuery>,
    RawQuery(raw): RawQuery,
) -> Result<CatalogTemplate> {
    let (category, sub) = path;
    let lang = resolve_lang(&session).await;
    let base_params = scope_params(&category, Some(&sub));
    render_scoped(
        &state,
        lang,
        format!("{category} / {sub}"),
        format!(
            "/catalog/{}/{}",
            urlencoding::encode(&category),
            urlencoding::encode(&sub)
        ),
        base_params,
        parse_filters(raw.as_deref()),
        page.page.unwrap_or(1),
        current.is_some(),
    )
    .await
}

/// Backend params for a category scope. `all` means unscoped.
fn scope_params(category: &str, sub: Option<&str>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if !category.is_empty() && category != "all" {
        params.push(("category".to_owned(), category.to_owned()));
    }
    if let Some(sub) = sub
        && !sub.is_empty()
        && sub != "all"
    {
        params.push(("subCategory".to_owned(), sub.to_owned()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_params() {
        assert!(scope_params("all", None).is_empty());
        assert_eq!(
            scope_params("sofas", None),
            vec![("category".to_owned(), "sofas".to_owned())]
        );
        assert_eq!(
            scope_params("sofas", Some("corner")),
            vec![
                ("category".to_owned(), "sofas".to_owned()),
                ("subCategory".to_owned(), "corner".to_owned()),
            ]
        );
        // "all" subcategory widens to the whole category
        assert_eq!(
            scope_params("sofas", Some("all")),
            vec![("category".to_owned(), "sofas".to_owned())]
        );
    }

    #[test]
    fn test_parse_filters_ignores_page_param() {
        let filters = parse_filters(Some("hasDiscount=1&page=3"));
        assert!(filters.has_discount);
        // page is pagination state, not filter state
        assert_eq!(filters.to_query_pairs().iter().filter(|(k, _)| k == "page").count(), 0);
    }
}
