//! Lookup helpers for the backend translation trees.
//!
//! Translations arrive as one nested JSON object per language
//! (`GET /api/translations/{lang}`, cached by the API client). UI code reads
//! them with dotted paths and falls back to the raw key, so a missing
//! translation degrades to something legible instead of a blank.

use serde_json::Value;

/// Resolve a dotted path (`locations.types.shop`) in a translation tree.
#[must_use]
pub fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a str> {
    let mut node = tree;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    node.as_str()
}

/// Resolve a dotted path, falling back to the final key itself.
#[must_use]
pub fn lookup_or_key(tree: &Value, path: &str) -> String {
    lookup(tree, path).map_or_else(
        || path.rsplit('.').next().unwrap_or(path).to_owned(),
        str::to_owned,
    )
}

/// Resolve a dynamic key under a fixed prefix, falling back to the key.
///
/// `lookup_keyed(t, "colors", "oak")` reads `t.colors.oak` and falls back to
/// `"oak"` - the pattern used for facet labels, location names, and the like.
#[must_use]
pub fn lookup_keyed(tree: &Value, prefix: &str, key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    tree.get(prefix)
        .and_then(|node| node.get(key))
        .and_then(Value::as_str)
        .map_or_else(|| key.to_owned(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Value {
        json!({
            "locations": {
                "types": {"shop": "Магазин", "office": "Офіс"},
                "cities": {"kyiv": "Київ"},
            },
            "colors": {"oak": "Дуб"},
        })
    }

    #[test]
    fn test_lookup_dotted_path() {
        let t = tree();
        assert_eq!(lookup(&t, "locations.types.shop"), Some("Магазин"));
        assert_eq!(lookup(&t, "locations.types.warehouse"), None);
        assert_eq!(lookup(&t, "missing.path"), None);
    }

    #[test]
    fn test_lookup_or_key_falls_back_to_leaf() {
        let t = tree();
        assert_eq!(lookup_or_key(&t, "locations.types.shop"), "Магазин");
        assert_eq!(lookup_or_key(&t, "locations.types.warehouse"), "warehouse");
    }

    #[test]
    fn test_lookup_keyed() {
        let t = tree();
        assert_eq!(lookup_keyed(&t, "colors", "oak"), "Дуб");
        assert_eq!(lookup_keyed(&t, "colors", "ash"), "ash");
        assert_eq!(lookup_keyed(&t, "colors", ""), "");
    }
}
