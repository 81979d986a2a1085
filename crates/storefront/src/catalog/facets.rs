//! Facet derivation for the filter drawer.
//!
//! Facets are the distinct filterable attribute values present in the
//! currently loaded product list, sorted for stable rendering.

use std::collections::BTreeSet;

use crate::api::types::Product;

/// Distinct facet values derived from a product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub color_keys: Vec<String>,
    pub style_keys: Vec<String>,
    pub room_keys: Vec<String>,
    pub collection_keys: Vec<String>,
    pub material_keys: Vec<String>,
    pub manufacturer_keys: Vec<String>,
    pub bed_sizes: Vec<String>,
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Derive facets from a loaded product list.
#[must_use]
pub fn derive_facets(products: &[Product]) -> Facets {
    Facets {
        color_keys: distinct_sorted(
            products
                .iter()
                .flat_map(|p| p.color_keys.iter())
                .map(String::as_str),
        ),
        style_keys: distinct_sorted(
            products
                .iter()
                .flat_map(|p| p.style_keys.iter())
                .map(String::as_str),
        ),
        room_keys: distinct_sorted(
            products
                .iter()
                .flat_map(|p| p.room_keys.iter())
                .map(String::as_str),
        ),
        collection_keys: distinct_sorted(
            products
                .iter()
                .flat_map(|p| p.collection_keys.iter())
                .map(String::as_str),
        ),
        material_keys: distinct_sorted(
            products
                .iter()
                .filter_map(|p| p.specifications.material_key.as_deref()),
        ),
        manufacturer_keys: distinct_sorted(
            products
                .iter()
                .filter_map(|p| p.specifications.manufacturer.as_deref()),
        ),
        bed_sizes: distinct_sorted(
            products
                .iter()
                .filter_map(|p| p.specifications.bed_size.as_deref()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_facets_distinct_sorted() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[
                {"_id": "p1", "colorKeys": ["white", "oak"], "specifications": {"materialKey": "oak"}},
                {"_id": "p2", "colorKeys": ["oak", " black "], "specifications": {"materialKey": "ash"}},
                {"_id": "p3", "colorKeys": [""], "styleKeys": ["loft"]}
            ]"#,
        )
        .expect("fixture");

        let facets = derive_facets(&products);
        assert_eq!(facets.color_keys, vec!["black", "oak", "white"]);
        assert_eq!(facets.style_keys, vec!["loft"]);
        assert_eq!(facets.material_keys, vec!["ash", "oak"]);
        assert!(facets.bed_sizes.is_empty());
    }

    #[test]
    fn test_derive_facets_empty_list() {
        assert_eq!(derive_facets(&[]), Facets::default());
    }
}
