//! Collections: cards derived from catalog facets, and per-collection grids.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use super::{ProductCardView, resolve_lang};
use crate::catalog::derive_facets;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::services::translations::lookup_keyed;
use crate::state::AppState;

/// One collection card.
#[derive(Debug, Clone)]
pub struct CollectionCardView {
    pub key: String,
    pub label: String,
    pub href: String,
    pub image: String,
    pub product_count: usize,
}

/// Collections index template.
#[derive(Template, WebTemplate)]
#[template(path = "collections.html")]
pub struct CollectionsTemplate {
    pub collections: Vec<CollectionCardView>,
    pub logged_in: bool,
}

/// One collection's products.
#[derive(Template, WebTemplate)]
#[template(path = "collection.html")]
pub struct CollectionTemplate {
    pub label: String,
    pub products: Vec<ProductCardView>,
    pub logged_in: bool,
}

/// `GET /collections` - cards for every collection key in the catalog.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
) -> Result<CollectionsTemplate> {
    let lang = resolve_lang(&session).await;
    let origin = state.api().origin();

    let products = state.api().get_products().await.unwrap_or_default();
    let translations = state
        .api()
        .get_translations(lang)
        .await
        .unwrap_or(serde_json::Value::Null);

    let collections = derive_facets(&products)
        .collection_keys
        .into_iter()
        .map(|key| {
            let in_collection: Vec<_> = products
                .iter()
                .filter(|p| p.collection_keys.iter().any(|k| k == &key))
                .collect();
            let image = in_collection
                .iter()
                .find_map(|p| p.primary_image())
                .map_or_else(
                    || crate::api::conversions::PLACEHOLDER_IMAGE.to_owned(),
                    |raw| crate::api::conversions::resolve_image_url(origin, raw),
                );
            CollectionCardView {
                label: lookup_keyed(&translations, "collections", &key),
                href: format!("/collections/{}", urlencoding::encode(&key)),
                image,
                product_count: in_collection.len(),
                key,
            }
        })
        .collect();

    Ok(CollectionsTemplate {
        collections,
        logged_in: current.is_some(),
    })
}

/// `GET /collections/{key}` - the collection's product grid.
#[instrument(skip_all, fields(collection = %key))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(current): OptionalAuth,
    Path(key): Path<String>,
) -> Result<CollectionTemplate> {
    let lang = resolve_lang(&session).await;
    let origin = state.api().origin();

    let params = vec![("collectionKeys".to_owned(), key.clone())];
    let products = state.api().filter_products(&params).await?;
    let translations = state
        .api()
        .get_translations(lang)
        .await
        .unwrap_or(serde_json::Value::Null);

    let liked: Vec<String> = Vec::new();
    Ok(CollectionTemplate {
        label: lookup_keyed(&translations, "collections", &key),
        products: products
            .iter()
            .map(|p| ProductCardView::from_product(p, origin, lang, &liked))
            .collect(),
        logged_in: current.is_some(),
    })
}
