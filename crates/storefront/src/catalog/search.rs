//! In-memory product matching for the header search.
//!
//! The backend applies the real filter; this matcher covers instant search
//! over an already-loaded list (header dropdown, favorites page filter).

use meblihub_core::Lang;

use crate::api::types::Product;

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Whether a product matches a free-text query.
///
/// Case-insensitive substring match over localized name and description,
/// type key, category, material, manufacturer, and bed size. An empty query
/// matches everything.
#[must_use]
pub fn matches_query(product: &Product, query: &str, lang: Lang) -> bool {
    let term = norm(query);
    if term.is_empty() {
        return true;
    }

    let specs = &product.specifications;
    let fields = [
        Some(product.name.pick(lang)),
        Some(product.description.pick(lang)),
        product.type_key.clone(),
        product.category.clone(),
        specs.material_key.clone(),
        specs.manufacturer.clone(),
        specs.bed_size.clone(),
    ];

    fields
        .into_iter()
        .flatten()
        .filter(|f| !f.is_empty())
        .any(|f| norm(&f).contains(&term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(json: &str) -> Product {
        serde_json::from_str(json).expect("product fixture")
    }

    #[test]
    fn test_empty_query_matches_all() {
        let p = product(r#"{"_id": "p1"}"#);
        assert!(matches_query(&p, "", Lang::Ua));
        assert!(matches_query(&p, "   ", Lang::Ua));
    }

    #[test]
    fn test_matches_localized_name() {
        let p = product(r#"{"_id": "p1", "name": {"ua": "Кутовий диван", "en": "Corner sofa"}}"#);
        assert!(matches_query(&p, "диван", Lang::Ua));
        assert!(matches_query(&p, "ДИВАН", Lang::Ua));
        assert!(matches_query(&p, "corner", Lang::En));
        assert!(!matches_query(&p, "шафа", Lang::Ua));
    }

    #[test]
    fn test_matches_specification_fields() {
        let p = product(
            r#"{"_id": "p1", "specifications": {"materialKey": "oak", "manufacturer": "MebliCo"}}"#,
        );
        assert!(matches_query(&p, "oak", Lang::Ua));
        assert!(matches_query(&p, "meblico", Lang::Ua));
    }

    #[test]
    fn test_matches_category_and_type() {
        let p = product(r#"{"_id": "p1", "category": "sofas", "typeKey": "corner"}"#);
        assert!(matches_query(&p, "sofa", Lang::Ua));
        assert!(matches_query(&p, "corner", Lang::Ua));
    }
}
