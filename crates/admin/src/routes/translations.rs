//! Translation viewer: pretty-printed per-language trees.
//!
//! Editing goes through the backend's own tooling; the panel only inspects
//! what the storefront will actually serve.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use meblihub_core::Lang;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Language selector query.
#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// Translations template.
#[derive(Template, WebTemplate)]
#[template(path = "translations.html")]
pub struct TranslationsTemplate {
    pub lang: String,
    pub json: String,
}

/// `GET /translations?lang=ua|en`.
#[instrument(skip_all)]
pub async fn view(
    State(state): State<AppState>,
    RequireAdmin(_current): RequireAdmin,
    Query(query): Query<LangQuery>,
) -> Result<TranslationsTemplate> {
    let lang = Lang::normalize(query.lang.as_deref().unwrap_or_default());
    let tree = state.api().translations(lang).await?;

    Ok(TranslationsTemplate {
        lang: lang.as_str().to_owned(),
        json: serde_json::to_string_pretty(&tree).unwrap_or_else(|_| "{}".to_owned()),
    })
}
