//! Sales page: the catalog scoped to discounted products.

use axum::extract::{Query, RawQuery, State};
use tower_sessions::Session;
use tracing::instrument;

use super::catalog::{CatalogTemplate, PageQuery};
use crate::catalog::ProductFilters;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// `GET /sales` - every discounted product, with the usual filter drawer.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Query(page): Query<PageQuery>,
    RawQuery(raw): RawQuery,
) -> Result<CatalogTemplate> {
    let lang = super::resolve_lang(&session).await;

    let mut filters = ProductFilters::from_query_str(raw.as_deref().unwrap_or_default());
    // The page's whole point; not removable through the filter drawer
    filters.has_discount = true;

    super::catalog::render_scoped(
        &state,
        lang,
        "Акції".to_owned(),
        "/sales".to_owned(),
        Vec::new(),
        filters,
        page.page.unwrap_or(1),
        current.is_some(),
    )
    .await
}
