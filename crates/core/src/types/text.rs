//! Localized text as served by the catalog API.
//!
//! Catalog documents carry text fields in three shapes: a plain string, a bare
//! number, or a `{"ua": ..., "en": ...}` map. [`LocalizedText`] deserializes
//! all of them and [`LocalizedText::pick`] resolves a display string with the
//! ua -> en fallback chain the site uses everywhere.

use serde::{Deserialize, Serialize};

/// Site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Ukrainian (default site language).
    #[default]
    Ua,
    /// English.
    En,
}

impl Lang {
    /// Normalize a raw language tag.
    ///
    /// Accepts the legacy `"uk"` tag as Ukrainian; anything unknown or empty
    /// falls back to Ukrainian.
    #[must_use]
    pub fn normalize(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "en" => Self::En,
            _ => Self::Ua,
        }
    }

    /// The canonical tag used in API paths and query params.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ua => "ua",
            Self::En => "en",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A text value that may or may not be localized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    /// Plain string, shown as-is in every language.
    Plain(String),
    /// Bare number (older catalog rows store numeric labels).
    Number(f64),
    /// Per-language map; either side may be missing.
    Map {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ua: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        en: Option<String>,
    },
}

impl LocalizedText {
    /// Resolve a display string: requested language, then ua, then en,
    /// then empty.
    #[must_use]
    pub fn pick(&self, lang: Lang) -> String {
        match self {
            Self::Plain(s) => s.clone(),
            Self::Number(n) => {
                // Integral numbers print without a trailing ".0"
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Map { ua, en } => {
                let preferred = match lang {
                    Lang::Ua => ua,
                    Lang::En => en,
                };
                preferred
                    .as_deref()
                    .or(ua.as_deref())
                    .or(en.as_deref())
                    .unwrap_or_default()
                    .to_owned()
            }
        }
    }

    /// Whether no language resolves to a non-empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pick(Lang::Ua).is_empty() && self.pick(Lang::En).is_empty()
    }
}

impl Default for LocalizedText {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<&str> for LocalizedText {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_legacy_uk_tag() {
        assert_eq!(Lang::normalize("uk"), Lang::Ua);
        assert_eq!(Lang::normalize("ua"), Lang::Ua);
        assert_eq!(Lang::normalize("en"), Lang::En);
        assert_eq!(Lang::normalize("EN"), Lang::En);
        assert_eq!(Lang::normalize(""), Lang::Ua);
        assert_eq!(Lang::normalize("de"), Lang::Ua);
    }

    #[test]
    fn test_pick_plain_ignores_lang() {
        let t = LocalizedText::from("Диван");
        assert_eq!(t.pick(Lang::Ua), "Диван");
        assert_eq!(t.pick(Lang::En), "Диван");
    }

    #[test]
    fn test_pick_map_fallback_chain() {
        let both: LocalizedText =
            serde_json::from_str(r#"{"ua": "Стіл", "en": "Table"}"#).expect("parse");
        assert_eq!(both.pick(Lang::Ua), "Стіл");
        assert_eq!(both.pick(Lang::En), "Table");

        let ua_only: LocalizedText = serde_json::from_str(r#"{"ua": "Стіл"}"#).expect("parse");
        assert_eq!(ua_only.pick(Lang::En), "Стіл");

        let en_only: LocalizedText = serde_json::from_str(r#"{"en": "Table"}"#).expect("parse");
        assert_eq!(en_only.pick(Lang::Ua), "Table");

        let neither: LocalizedText = serde_json::from_str("{}").expect("parse");
        assert_eq!(neither.pick(Lang::Ua), "");
        assert!(neither.is_empty());
    }

    #[test]
    fn test_pick_number() {
        let n: LocalizedText = serde_json::from_str("42").expect("parse");
        assert_eq!(n.pick(Lang::Ua), "42");

        let f: LocalizedText = serde_json::from_str("4.5").expect("parse");
        assert_eq!(f.pick(Lang::En), "4.5");
    }

    #[test]
    fn test_deserialize_plain_string() {
        let t: LocalizedText = serde_json::from_str(r#""Шафа""#).expect("parse");
        assert_eq!(t, LocalizedText::Plain("Шафа".to_owned()));
    }
}
