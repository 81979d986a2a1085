//! Filter state round-trips through real storefront URLs.

use url::Url;

use meblihub_storefront::catalog::ProductFilters;

fn filters_from_url(raw: &str) -> ProductFilters {
    let url = Url::parse(raw).expect("valid url");
    ProductFilters::from_query_str(url.query().unwrap_or_default())
}

#[test]
fn test_filters_survive_a_full_url_round_trip() {
    let filters = ProductFilters {
        q: "кутовий диван".to_owned(),
        sort: "priceAsc".to_owned(),
        has_discount: true,
        in_stock: true,
        price_min: Some(5000),
        price_max: Some(30000),
        width_min: Some(200),
        material_key: "oak".to_owned(),
        color_keys: vec!["grey".to_owned(), "white".to_owned()],
        room_keys: vec!["living".to_owned()],
        ..ProductFilters::default()
    };

    let href = format!(
        "http://localhost:3000/catalog/sofas?{}",
        filters.to_query_string()
    );
    let decoded = filters_from_url(&href);

    assert_eq!(decoded, filters);
}

#[test]
fn test_hand_written_url_decodes_with_defaults() {
    let decoded = filters_from_url(
        "http://localhost:3000/catalog?hasDiscount=yes&colorKeys=oak,white&colorKeys=black&priceMax=oops",
    );

    assert!(decoded.has_discount);
    assert_eq!(decoded.color_keys, vec!["oak", "white", "black"]);
    // Malformed numeric input falls back to unset
    assert_eq!(decoded.price_max, None);
    // Untouched fields stay at their defaults
    assert_eq!(decoded.sort, "newest");
    assert!(!decoded.has_model);
}

#[test]
fn test_api_params_carry_category_scope_and_encoding() {
    let filters = ProductFilters {
        has_model: true,
        bed_size: "160x200".to_owned(),
        ..ProductFilters::default()
    };

    let base = vec![
        ("category".to_owned(), "beds".to_owned()),
        ("subCategory".to_owned(), "double".to_owned()),
    ];
    let params = filters.to_api_params(&base);

    assert!(params.contains(&("category".to_owned(), "beds".to_owned())));
    assert!(params.contains(&("hasModel".to_owned(), "1".to_owned())));
    assert!(params.contains(&("bedSize".to_owned(), "160x200".to_owned())));
}
