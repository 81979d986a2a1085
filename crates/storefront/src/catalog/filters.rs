//! Product filter state and its query-string wire format.
//!
//! The same filter record round-trips through three encodings:
//! the browser URL (`?hasDiscount=1&colorKeys=oak,white`), the backend filter
//! endpoint params, and the filter drawer form. Defaults are never encoded, so
//! a pristine catalog URL stays clean.

use std::collections::HashMap;

/// Default sort key (the only client-significant one; the rest are opaque
/// strings the backend interprets).
pub const DEFAULT_SORT: &str = "newest";

/// Catalog filter state with its documented defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilters {
    /// Free-text search query. Default: empty.
    pub q: String,
    /// Sort key, forwarded to the backend. Default: `newest`.
    pub sort: String,
    /// Only discounted products. Default: false.
    pub has_discount: bool,
    /// Only products with a 3D model. Default: false.
    pub has_model: bool,
    /// Only products in stock. Default: false.
    pub in_stock: bool,
    /// Price range, hryvnias.
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    /// Discount range, percent.
    pub discount_min: Option<i64>,
    pub discount_max: Option<i64>,
    /// Dimension ranges, centimeters.
    pub width_min: Option<i64>,
    pub width_max: Option<i64>,
    pub height_min: Option<i64>,
    pub height_max: Option<i64>,
    pub depth_min: Option<i64>,
    pub depth_max: Option<i64>,
    /// Weight range, kilograms.
    pub weight_min: Option<i64>,
    pub weight_max: Option<i64>,
    /// Warranty range, months.
    pub warranty_min: Option<i64>,
    pub warranty_max: Option<i64>,
    /// Single-select facet keys. Default: empty.
    pub material_key: String,
    pub manufacturer_key: String,
    pub bed_size: String,
    /// Multi-select facet keys. Default: empty.
    pub color_keys: Vec<String>,
    pub style_keys: Vec<String>,
    pub room_keys: Vec<String>,
    pub collection_keys: Vec<String>,
}

impl Default for ProductFilters {
    fn default() -> Self {
        Self {
            q: String::new(),
            sort: DEFAULT_SORT.to_owned(),
            has_discount: false,
            has_model: false,
            in_stock: false,
            price_min: None,
            price_max: None,
            discount_min: None,
            discount_max: None,
            width_min: None,
            width_max: None,
            height_min: None,
            height_max: None,
            depth_min: None,
            depth_max: None,
            weight_min: None,
            weight_max: None,
            warranty_min: None,
            warranty_max: None,
            material_key: String::new(),
            manufacturer_key: String::new(),
            bed_size: String::new(),
            color_keys: Vec::new(),
            style_keys: Vec::new(),
            room_keys: Vec::new(),
            collection_keys: Vec::new(),
        }
    }
}

/// Parse a boolean query param: `1`, `true`, `yes`, `on` (any case) are true,
/// everything else is false.
#[must_use]
pub fn parse_bool_param(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Read a multi-value param: every occurrence of the key, each split on
/// commas, trimmed, empties dropped.
#[must_use]
pub fn read_array_param(pairs: &[(String, String)], key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_num(pairs: &[(String, String)], key: &str) -> Option<i64> {
    first(pairs, key).and_then(|v| v.trim().parse().ok())
}

fn nonempty(pairs: &[(String, String)], key: &str) -> String {
    first(pairs, key).unwrap_or_default().trim().to_owned()
}

impl ProductFilters {
    /// Decode filters from URL query pairs. Missing or malformed values fall
    /// back to the field defaults.
    #[must_use]
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let sort = nonempty(pairs, "sort");
        Self {
            q: nonempty(pairs, "q"),
            sort: if sort.is_empty() {
                DEFAULT_SORT.to_owned()
            } else {
                sort
            },
            has_discount: first(pairs, "hasDiscount").is_some_and(parse_bool_param),
            has_model: first(pairs, "hasModel").is_some_and(parse_bool_param),
            in_stock: first(pairs, "inStock").is_some_and(parse_bool_param),
            price_min: parse_num(pairs, "priceMin"),
            price_max: parse_num(pairs, "priceMax"),
            discount_min: parse_num(pairs, "discountMin"),
            discount_max: parse_num(pairs, "discountMax"),
            width_min: parse_num(pairs, "widthMin"),
            width_max: parse_num(pairs, "widthMax"),
            height_min: parse_num(pairs, "heightMin"),
            height_max: parse_num(pairs, "heightMax"),
            depth_min: parse_num(pairs, "depthMin"),
            depth_max: parse_num(pairs, "depthMax"),
            weight_min: parse_num(pairs, "weightMin"),
            weight_max: parse_num(pairs, "weightMax"),
            warranty_min: parse_num(pairs, "warrantyMin"),
            warranty_max: parse_num(pairs, "warrantyMax"),
            material_key: nonempty(pairs, "materialKey"),
            manufacturer_key: nonempty(pairs, "manufacturerKey"),
            bed_size: nonempty(pairs, "bedSize"),
            color_keys: read_array_param(pairs, "colorKeys"),
            style_keys: read_array_param(pairs, "styleKeys"),
            room_keys: read_array_param(pairs, "roomKeys"),
            collection_keys: read_array_param(pairs, "collectionKeys"),
        }
    }

    /// Decode filters from a raw query string (`a=1&b=x%2Cy`).
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self::from_query_pairs(&pairs)
    }

    /// Encode filters as query pairs, omitting defaults. Booleans encode as
    /// `1`, multi-selects join with commas. The sort key is always present
    /// (it is never empty).
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();

        let mut push_str = |key: &str, value: &str| {
            if !value.trim().is_empty() {
                pairs.push((key.to_owned(), value.trim().to_owned()));
            }
        };

        push_str("q", &self.q);
        push_str("sort", &self.sort);

        let mut push_bool = |key: &str, value: bool| {
            if value {
                pairs.push((key.to_owned(), "1".to_owned()));
            }
        };
        push_bool("hasDiscount", self.has_discount);
        push_bool("hasModel", self.has_model);
        push_bool("inStock", self.in_stock);

        let mut push_num = |key: &str, value: Option<i64>| {
            if let Some(n) = value {
                pairs.push((key.to_owned(), n.to_string()));
            }
        };
        push_num("priceMin", self.price_min);
        push_num("priceMax", self.price_max);
        push_num("discountMin", self.discount_min);
        push_num("discountMax", self.discount_max);
        push_num("widthMin", self.width_min);
        push_num("widthMax", self.width_max);
        push_num("heightMin", self.height_min);
        push_num("heightMax", self.height_max);
        push_num("depthMin", self.depth_min);
        push_num("depthMax", self.depth_max);
        push_num("weightMin", self.weight_min);
        push_num("weightMax", self.weight_max);
        push_num("warrantyMin", self.warranty_min);
        push_num("warrantyMax", self.warranty_max);

        let mut push_str = |key: &str, value: &str| {
            if !value.trim().is_empty() {
                pairs.push((key.to_owned(), value.trim().to_owned()));
            }
        };
        push_str("materialKey", &self.material_key);
        push_str("manufacturerKey", &self.manufacturer_key);
        push_str("bedSize", &self.bed_size);

        let mut push_list = |key: &str, values: &[String]| {
            if !values.is_empty() {
                pairs.push((key.to_owned(), values.join(",")));
            }
        };
        push_list("colorKeys", &self.color_keys);
        push_list("styleKeys", &self.style_keys);
        push_list("roomKeys", &self.room_keys);
        push_list("collectionKeys", &self.collection_keys);

        pairs
    }

    /// Encode filters as a query string suitable for an `href`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.to_query_pairs() {
            serializer.append_pair(&k, &v);
        }
        serializer.finish()
    }

    /// Build params for the backend filter endpoint: `base` pairs (category,
    /// subcategory) with the filter encoding layered on top. Filter keys win
    /// over base keys.
    #[must_use]
    pub fn to_api_params(&self, base: &[(String, String)]) -> Vec<(String, String)> {
        let own = self.to_query_pairs();
        let own_keys: HashMap<&str, ()> = own.iter().map(|(k, _)| (k.as_str(), ())).collect();

        let mut params: Vec<(String, String)> = base
            .iter()
            .filter(|(k, _)| !own_keys.contains_key(k.as_str()))
            .cloned()
            .collect();
        params.extend(own);
        params
    }

    /// Whether every field is at its default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Number of active filter chips shown above the grid. Ranges count once
    /// per pair; multi-selects once per selected key. The query and sort are
    /// not chips.
    #[must_use]
    pub fn active_chip_count(&self) -> usize {
        let flags = usize::from(self.has_discount)
            + usize::from(self.has_model)
            + usize::from(self.in_stock);

        let ranges = [
            (self.price_min, self.price_max),
            (self.discount_min, self.discount_max),
            (self.width_min, self.width_max),
            (self.height_min, self.height_max),
            (self.depth_min, self.depth_max),
            (self.weight_min, self.weight_max),
            (self.warranty_min, self.warranty_max),
        ]
        .iter()
        .filter(|(min, max)| min.is_some() || max.is_some())
        .count();

        let singles = usize::from(!self.material_key.is_empty())
            + usize::from(!self.manufacturer_key.is_empty())
            + usize::from(!self.bed_size.is_empty());

        let multi = self.color_keys.len()
            + self.style_keys.len()
            + self.room_keys.len()
            + self.collection_keys.len();

        flags + ranges + singles + multi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_bool_param_truth_table() {
        for truthy in ["1", "true", "yes", "on", "TRUE", "Yes", " on "] {
            assert!(parse_bool_param(truthy), "{truthy} should be true");
        }
        for falsy in ["", "0", "false", "no", "off", "2", "hasDiscount"] {
            assert!(!parse_bool_param(falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn test_array_param_repeated_keys() {
        let p = pairs(&[("colorKeys", "oak"), ("colorKeys", "white")]);
        assert_eq!(read_array_param(&p, "colorKeys"), vec!["oak", "white"]);
    }

    #[test]
    fn test_array_param_comma_joined() {
        let p = pairs(&[("colorKeys", "oak, white ,,black")]);
        assert_eq!(
            read_array_param(&p, "colorKeys"),
            vec!["oak", "white", "black"]
        );
    }

    #[test]
    fn test_array_param_mixed() {
        let p = pairs(&[("roomKeys", "living,kitchen"), ("roomKeys", "bedroom")]);
        assert_eq!(
            read_array_param(&p, "roomKeys"),
            vec!["living", "kitchen", "bedroom"]
        );
    }

    #[test]
    fn test_defaults_from_empty_query() {
        let filters = ProductFilters::from_query_pairs(&[]);
        assert_eq!(filters, ProductFilters::default());
        assert_eq!(filters.sort, "newest");
        assert!(filters.is_default());
        assert_eq!(filters.active_chip_count(), 0);
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let p = pairs(&[("priceMin", "abc"), ("priceMax", "12x"), ("widthMin", " 80 ")]);
        let filters = ProductFilters::from_query_pairs(&p);
        assert_eq!(filters.price_min, None);
        assert_eq!(filters.price_max, None);
        assert_eq!(filters.width_min, Some(80));
    }

    #[test]
    fn test_round_trip() {
        let p = pairs(&[
            ("q", "диван"),
            ("sort", "priceAsc"),
            ("hasDiscount", "1"),
            ("priceMin", "1000"),
            ("priceMax", "25000"),
            ("materialKey", "oak"),
            ("colorKeys", "white,black"),
            ("styleKeys", "modern"),
        ]);
        let filters = ProductFilters::from_query_pairs(&p);
        assert!(filters.has_discount);
        assert_eq!(filters.color_keys, vec!["white", "black"]);

        let encoded = filters.to_query_pairs();
        let decoded = ProductFilters::from_query_pairs(&encoded);
        assert_eq!(decoded, filters);
    }

    #[test]
    fn test_round_trip_through_query_string() {
        let mut filters = ProductFilters {
            q: "кутовий диван".to_owned(),
            has_model: true,
            warranty_min: Some(12),
            collection_keys: vec!["loft".to_owned(), "scandi".to_owned()],
            ..ProductFilters::default()
        };
        filters.color_keys.push("grey".to_owned());

        let qs = filters.to_query_string();
        let decoded = ProductFilters::from_query_str(&qs);
        assert_eq!(decoded, filters);
    }

    #[test]
    fn test_defaults_not_encoded() {
        let encoded = ProductFilters::default().to_query_pairs();
        // Only the (never-empty) sort key survives
        assert_eq!(encoded, pairs(&[("sort", "newest")]));
    }

    #[test]
    fn test_api_params_merge_base() {
        let filters = ProductFilters {
            has_discount: true,
            ..ProductFilters::default()
        };
        let base = pairs(&[("category", "sofas"), ("subCategory", "corner")]);
        let params = filters.to_api_params(&base);

        assert!(params.contains(&("category".to_owned(), "sofas".to_owned())));
        assert!(params.contains(&("subCategory".to_owned(), "corner".to_owned())));
        assert!(params.contains(&("hasDiscount".to_owned(), "1".to_owned())));
        assert!(params.contains(&("sort".to_owned(), "newest".to_owned())));
    }

    #[test]
    fn test_api_params_filter_wins_over_base() {
        let filters = ProductFilters {
            sort: "priceDesc".to_owned(),
            ..ProductFilters::default()
        };
        let base = pairs(&[("sort", "newest"), ("category", "sofas")]);
        let params = filters.to_api_params(&base);

        let sorts: Vec<_> = params.iter().filter(|(k, _)| k == "sort").collect();
        assert_eq!(sorts.len(), 1);
        assert_eq!(sorts.first().map(|(_, v)| v.as_str()), Some("priceDesc"));
    }

    #[test]
    fn test_active_chip_count() {
        let filters = ProductFilters {
            has_discount: true,
            price_min: Some(1000),
            price_max: Some(5000),
            material_key: "oak".to_owned(),
            color_keys: vec!["white".to_owned(), "black".to_owned()],
            q: "ignored".to_owned(),
            ..ProductFilters::default()
        };
        // flag + one range + one single + two list items
        assert_eq!(filters.active_chip_count(), 5);
    }
}
