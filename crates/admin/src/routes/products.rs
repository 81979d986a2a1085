//! Product CRUD.
//!
//! Forms post urlencoded fields; [`ProductForm::to_payload`] shapes them into
//! the JSON document the catalog API stores (localized name/description
//! maps, numeric dimensions, image URL list).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use meblihub_core::{Lang, ProductId, format_uah};

use crate::api::types::AdminProduct;
use crate::components::{Table, TableColumn};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Search query for the list page.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/list.html")]
pub struct ProductListTemplate {
    pub table: Table,
    pub q: String,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub heading: String,
    pub action: String,
    /// Non-empty only when editing an existing product.
    pub delete_action: String,
    pub form: ProductForm,
    pub error: String,
}

/// Raw product form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name_ua: String,
    pub name_en: String,
    pub description_ua: String,
    pub description_en: String,
    pub price: String,
    pub discount: String,
    pub category: String,
    pub sub_category: String,
    pub sku: String,
    /// One image URL per line.
    pub images: String,
    pub model_url: String,
    pub in_stock: Option<String>,
    pub width: String,
    pub height: String,
    pub depth: String,
    pub weight: String,
}

impl ProductForm {
    /// Validate the form; both localized names are required.
    #[must_use]
    pub fn validation_error(&self) -> Option<String> {
        if self.name_ua.trim().is_empty() || self.name_en.trim().is_empty() {
            return Some("Name UA/EN are required".to_owned());
        }
        None
    }

    /// Shape the form into the API's product document.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let parse_num = |raw: &str| raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());

        let images: Vec<String> = self
            .images
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        json!({
            "name": { "ua": self.name_ua.trim(), "en": self.name_en.trim() },
            "description": { "ua": self.description_ua.trim(), "en": self.description_en.trim() },
            "price": parse_num(&self.price).unwrap_or(0.0),
            "discount": parse_num(&self.discount).unwrap_or(0.0),
            "category": self.category.trim(),
            "subCategory": self.sub_category.trim(),
            "sku": self.sku.trim(),
            "images": images,
            "modelUrl": self.model_url.trim(),
            "inStock": self.in_stock.is_some(),
            "width": parse_num(&self.width),
            "height": parse_num(&self.height),
            "depth": parse_num(&self.depth),
            "weight": parse_num(&self.weight),
        })
    }

    fn from_product(product: &AdminProduct) -> Self {
        let pick = |text: &meblihub_core::LocalizedText, lang: Lang| text.pick(lang);
        Self {
            name_ua: pick(&product.name, Lang::Ua),
            name_en: pick(&product.name, Lang::En),
            description_ua: pick(&product.description, Lang::Ua),
            description_en: pick(&product.description, Lang::En),
            price: product.price.map(|v| v.to_string()).unwrap_or_default(),
            discount: product.discount.map(|v| v.to_string()).unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            sub_category: product.sub_category.clone().unwrap_or_default(),
            sku: product.sku.clone().unwrap_or_default(),
            images: product.images.join("\n"),
            model_url: product.model_url.clone().unwrap_or_default(),
            in_stock: product
                .in_stock
                .unwrap_or(true)
                .then(|| "on".to_owned()),
            width: product.width.map(|v| v.to_string()).unwrap_or_default(),
            height: product.height.map(|v| v.to_string()).unwrap_or_default(),
            depth: product.depth.map(|v| v.to_string()).unwrap_or_default(),
            weight: product.weight.map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

/// Case-insensitive search over both localized names and the SKU.
fn matches_search(product: &AdminProduct, query: &str) -> bool {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [
        product.name.pick(Lang::Ua),
        product.name.pick(Lang::En),
        product.sku.clone().unwrap_or_default(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

/// `GET /products` - the list.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Query(query): Query<SearchQuery>,
) -> Result<ProductListTemplate> {
    let q = query.q.unwrap_or_default();
    let products = state.api().list_products(&current.token).await?;

    let mut table = Table::new(vec![
        TableColumn::new("name", "Назва"),
        TableColumn::new("sku", "Артикул"),
        TableColumn::new("category", "Категорія"),
        TableColumn::new("price", "Ціна"),
        TableColumn::new("discount", "Знижка"),
    ]);
    for product in products.iter().filter(|p| matches_search(p, &q)) {
        let discount = product.discount_pct();
        table.push_linked_row(format!("/products/{}/edit", product.id), vec![
            product.name.pick(Lang::Ua),
            product.sku.clone().unwrap_or_default(),
            product.category.clone().unwrap_or_default(),
            if discount > 0 {
                format!(
                    "{} ({})",
                    format_uah(product.discounted_price()),
                    format_uah(product.base_price())
                )
            } else {
                format_uah(product.base_price())
            },
            if discount > 0 {
                format!("-{discount}%")
            } else {
                String::new()
            },
        ]);
    }

    Ok(ProductListTemplate { table, q })
}

/// `GET /products/new` - blank form.
#[instrument(skip_all)]
pub async fn new_form(RequireAdmin(_current): RequireAdmin) -> ProductFormTemplate {
    ProductFormTemplate {
        heading: "Новий товар".to_owned(),
        action: "/products".to_owned(),
        delete_action: String::new(),
        form: ProductForm::default(),
        error: String::new(),
    }
}

/// `GET /products/{id}/edit` - form prefilled from the API document.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let id = ProductId::new(id);
    let products = state.api().list_products(&current.token).await?;
    let product = products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| crate::error::AdminError::NotFound(format!("product {id}")))?;

    Ok(ProductFormTemplate {
        heading: "Редагувати товар".to_owned(),
        action: format!("/products/{id}"),
        delete_action: format!("/products/{id}/delete"),
        form: ProductForm::from_product(product),
        error: String::new(),
    })
}

/// `POST /products` - create.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Result<axum::response::Response> {
    use axum::response::IntoResponse;

    if let Some(error) = form.validation_error() {
        return Ok(ProductFormTemplate {
            heading: "Новий товар".to_owned(),
            action: "/products".to_owned(),
            delete_action: String::new(),
            form,
            error,
        }
        .into_response());
    }

    state
        .api()
        .create_product(&current.token, &form.to_payload())
        .await?;
    Ok(Redirect::to("/products").into_response())
}

/// `POST /products/{id}` - update.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<axum::response::Response> {
    use axum::response::IntoResponse;

    let id = ProductId::new(id);
    if let Some(error) = form.validation_error() {
        return Ok(ProductFormTemplate {
            heading: "Редагувати товар".to_owned(),
            action: format!("/products/{id}"),
            delete_action: format!("/products/{id}/delete"),
            form,
            error,
        }
        .into_response());
    }

    state
        .api()
        .update_product(&current.token, &id, &form.to_payload())
        .await?;
    Ok(Redirect::to("/products").into_response())
}

/// `POST /products/{id}/delete`.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(current): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = ProductId::new(id);
    state.api().delete_product(&current.token, &id).await?;
    Ok(Redirect::to("/products"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_payload_shapes_document() {
        let form = ProductForm {
            name_ua: " Диван ".to_owned(),
            name_en: "Sofa".to_owned(),
            price: "11999.50".to_owned(),
            discount: "15".to_owned(),
            category: "sofas".to_owned(),
            images: "/uploads/a.jpg\n\n /uploads/b.jpg \n".to_owned(),
            in_stock: Some("on".to_owned()),
            width: "220".to_owned(),
            weight: "abc".to_owned(),
            ..ProductForm::default()
        };

        let payload = form.to_payload();
        assert_eq!(payload["name"]["ua"], "Диван");
        assert_eq!(payload["name"]["en"], "Sofa");
        assert_eq!(payload["price"], 11999.5);
        assert_eq!(payload["discount"], 15.0);
        assert_eq!(
            payload["images"],
            serde_json::json!(["/uploads/a.jpg", "/uploads/b.jpg"])
        );
        assert_eq!(payload["inStock"], true);
        assert_eq!(payload["width"], 220.0);
        // Malformed numbers become null, not zero
        assert_eq!(payload["weight"], serde_json::Value::Null);
    }

    #[test]
    fn test_validation_requires_both_names() {
        let mut form = ProductForm {
            name_ua: "Диван".to_owned(),
            ..ProductForm::default()
        };
        assert!(form.validation_error().is_some());

        form.name_en = "Sofa".to_owned();
        assert!(form.validation_error().is_none());
    }

    #[test]
    fn test_matches_search() {
        let product: AdminProduct = serde_json::from_str(
            r#"{"_id": "p1", "name": {"ua": "Кутовий диван", "en": "Corner sofa"}, "sku": "SF-100"}"#,
        )
        .expect("parse");

        assert!(matches_search(&product, ""));
        assert!(matches_search(&product, "диван"));
        assert!(matches_search(&product, "CORNER"));
        assert!(matches_search(&product, "sf-100"));
        assert!(!matches_search(&product, "шафа"));
    }
}
