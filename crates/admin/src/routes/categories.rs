//! Category CRUD.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use meblihub_core::{CategoryId, Lang};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// One category row for the template.
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub id: String,
    pub key: String,
    pub name_ua: String,
    pub name_en: String,
    pub subcategory_count: usize,
}

/// Category list template (create form inline).
#[derive(Template, WebTemplate)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate {
    pub rows: Vec<CategoryRow>,
}

/// Category form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub key: String,
    pub name_ua: String,
    pub name_en: String,
}

impl CategoryForm {
    fn to_payload(&self) -> Value {
        json!({
            "category": self.key.trim(),
            "names": { "ua": self.name_ua.trim(), "en": self.name_en.trim() },
        })
    }
}

/// `GET /categories`.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
) -> Result<CategoriesTemplate> {
    let categories = state.api().list_categories(&current.token).await?;

    Ok(CategoriesTemplate {
        rows: categories
            .iter()
            .map(|c| CategoryRow {
                id: c.id.as_str().to_owned(),
                key: c.category.clone(),
                name_ua: c
                    .names
                    .as_ref()
                    .map(|n| n.pick(Lang::Ua))
                    .or_else(|| c.name.clone())
                    .unwrap_or_default(),
                name_en: c
                    .names
                    .as_ref()
                    .map(|n| n.pick(Lang::En))
                    .unwrap_or_default(),
                subcategory_count: c.subcategories.len(),
            })
            .collect(),
    })
}

/// `POST /categories` - create.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    if form.key.trim().is_empty() {
        return Err(crate::error::AdminError::BadRequest(
            "category key is required".to_owned(),
        ));
    }
    state
        .api()
        .create_category(&current.token, &form.to_payload())
        .await?;
    Ok(Redirect::to("/categories"))
}

/// `POST /categories/{id}` - update.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let id = CategoryId::new(id);
    state
        .api()
        .update_category(&current.token, &id, &form.to_payload())
        .await?;
    Ok(Redirect::to("/categories"))
}

/// `POST /categories/{id}/delete`.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = CategoryId::new(id);
    state.api().delete_category(&current.token, &id).await?;
    Ok(Redirect::to("/categories"))
}
