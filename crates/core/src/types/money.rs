//! Hryvnia price math.
//!
//! Catalog prices are whole hryvnias. Discounts are percentages applied with
//! half-up rounding; currency conversion uses NBU rates expressed as hryvnias
//! per one unit of foreign currency.

use std::collections::HashMap;

use rust_decimal::Decimal;

/// NBU exchange rates: hryvnias per 1 unit of each currency.
///
/// `UAH` is always present with rate 1.
#[derive(Debug, Clone)]
pub struct Rates(HashMap<String, Decimal>);

impl Rates {
    /// Build a rate table from `(code, rate)` pairs.
    ///
    /// Codes are uppercased; non-positive rates are dropped. `UAH => 1` is
    /// always inserted.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Decimal)>) -> Self {
        let mut map: HashMap<String, Decimal> = pairs
            .into_iter()
            .filter(|(_, rate)| *rate > Decimal::ZERO)
            .map(|(code, rate)| (code.to_uppercase(), rate))
            .collect();
        map.insert("UAH".to_owned(), Decimal::ONE);
        Self(map)
    }

    /// Rate for a currency code, if known.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.0.get(&code.to_uppercase()).copied()
    }

    /// Number of known currencies (including UAH).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether only the implicit UAH rate is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.len() <= 1
    }
}

impl Default for Rates {
    fn default() -> Self {
        Self::from_pairs([])
    }
}

/// Apply a percentage discount to a whole-hryvnia price.
///
/// The percentage is clamped to `[0, 100]`; the result is rounded half-up.
/// Non-positive prices yield 0, non-positive discounts leave the price as-is.
#[must_use]
pub fn apply_discount(price: i64, discount_percent: i64) -> i64 {
    if price <= 0 {
        return 0;
    }
    if discount_percent <= 0 {
        return price;
    }
    let pct = discount_percent.min(100);
    // round(price * (100 - pct) / 100) with half-up integer rounding
    (price * (100 - pct) + 50) / 100
}

/// Convert a hryvnia amount into another currency.
///
/// Falls back to the unconverted amount when the currency is unknown or its
/// rate is invalid, matching the site's behavior when rates fail to load.
#[must_use]
pub fn convert_from_uah(amount_uah: i64, currency: &str, rates: &Rates) -> Decimal {
    let amount = Decimal::from(amount_uah);
    let code = currency.trim().to_uppercase();
    if code.is_empty() || code == "UAH" {
        return amount;
    }
    match rates.get(&code) {
        Some(rate) if rate > Decimal::ZERO => amount / rate,
        _ => amount,
    }
}

/// Format a whole-hryvnia amount for display: `12 345 грн`.
///
/// Thousands are grouped with a non-breaking space, as `uk-UA` number
/// formatting does.
#[must_use]
pub fn format_uah(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 8);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped}\u{a0}грн")
    } else {
        format!("{grouped}\u{a0}грн")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    #[test]
    fn test_apply_discount_basic() {
        assert_eq!(apply_discount(1000, 10), 900);
        assert_eq!(apply_discount(999, 10), 899); // 899.1 rounds down
        assert_eq!(apply_discount(995, 10), 896); // 895.5 rounds half-up
    }

    #[test]
    fn test_apply_discount_clamps() {
        assert_eq!(apply_discount(1000, 150), 0); // clamped to 100%
        assert_eq!(apply_discount(1000, 100), 0);
        assert_eq!(apply_discount(1000, 0), 1000);
        assert_eq!(apply_discount(1000, -5), 1000);
    }

    #[test]
    fn test_apply_discount_nonpositive_price() {
        assert_eq!(apply_discount(0, 50), 0);
        assert_eq!(apply_discount(-100, 50), 0);
    }

    #[test]
    fn test_convert_from_uah() {
        let rates = Rates::from_pairs([
            ("USD".to_owned(), Decimal::from_f64(40.0).expect("decimal")),
            ("EUR".to_owned(), Decimal::from_f64(45.0).expect("decimal")),
        ]);

        assert_eq!(convert_from_uah(400, "USD", &rates), Decimal::from(10));
        assert_eq!(convert_from_uah(400, "usd", &rates), Decimal::from(10));
        assert_eq!(convert_from_uah(400, "UAH", &rates), Decimal::from(400));
        // Unknown currency falls back to the raw amount
        assert_eq!(convert_from_uah(400, "GBP", &rates), Decimal::from(400));
    }

    #[test]
    fn test_rates_drop_invalid() {
        let rates = Rates::from_pairs([
            ("USD".to_owned(), Decimal::ZERO),
            ("EUR".to_owned(), Decimal::from(-1)),
        ]);
        assert!(rates.get("USD").is_none());
        assert!(rates.get("EUR").is_none());
        assert_eq!(rates.get("UAH"), Some(Decimal::ONE));
        assert!(rates.is_empty());
    }

    #[test]
    fn test_format_uah_grouping() {
        assert_eq!(format_uah(0), "0\u{a0}грн");
        assert_eq!(format_uah(999), "999\u{a0}грн");
        assert_eq!(format_uah(1000), "1\u{a0}000\u{a0}грн");
        assert_eq!(format_uah(12345), "12\u{a0}345\u{a0}грн");
        assert_eq!(format_uah(1234567), "1\u{a0}234\u{a0}567\u{a0}грн");
        assert_eq!(format_uah(-2500), "-2\u{a0}500\u{a0}грн");
    }
}
