//! NBU exchange rates.
//!
//! Prices are stored and computed in hryvnias; the currency switcher converts
//! for display using the National Bank's public JSON feed. Rates are cached
//! for six hours; when the feed is down, conversion silently falls back to
//! hryvnias (a broken rate feed must never block the catalog).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{instrument, warn};

use meblihub_core::{Rates, convert_from_uah, format_uah};

/// Rate cache TTL.
const RATES_TTL: Duration = Duration::from_secs(6 * 60 * 60); // 6 hours

/// One row of the NBU exchange feed.
#[derive(Debug, Deserialize)]
struct NbuRow {
    /// ISO currency code.
    cc: Option<String>,
    /// Hryvnias per one unit.
    rate: Option<Decimal>,
}

/// Cached provider of NBU exchange rates.
#[derive(Clone)]
pub struct RateProvider {
    inner: Arc<RateProviderInner>,
}

struct RateProviderInner {
    client: reqwest::Client,
    url: String,
    cache: Cache<&'static str, Rates>,
}

impl RateProvider {
    /// Create a provider for the given NBU endpoint.
    #[must_use]
    pub fn new(url: String) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(RATES_TTL)
            .build();

        Self {
            inner: Arc::new(RateProviderInner {
                client: reqwest::Client::new(),
                url,
                cache,
            }),
        }
    }

    /// Current rate table.
    ///
    /// On feed failure returns the empty (UAH-only) table without caching it,
    /// so the next request retries.
    #[instrument(skip(self))]
    pub async fn rates(&self) -> Rates {
        if let Some(rates) = self.inner.cache.get(&"nbu").await {
            return rates;
        }

        match self.fetch().await {
            Ok(rates) => {
                self.inner.cache.insert("nbu", rates.clone()).await;
                rates
            }
            Err(e) => {
                warn!("NBU rate fetch failed: {e}");
                Rates::default()
            }
        }
    }

    /// Convert a hryvnia amount for display in the selected currency.
    pub async fn convert(&self, amount_uah: i64, currency: &str) -> Decimal {
        let rates = self.rates().await;
        convert_from_uah(amount_uah, currency, &rates)
    }

    async fn fetch(&self) -> Result<Rates, reqwest::Error> {
        let rows: Vec<NbuRow> = self
            .inner
            .client
            .get(&self.inner.url)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows_to_rates(rows))
    }
}

fn rows_to_rates(rows: Vec<NbuRow>) -> Rates {
    Rates::from_pairs(rows.into_iter().filter_map(|row| {
        let code = row.cc?.trim().to_uppercase();
        let rate = row.rate?;
        if code.is_empty() {
            return None;
        }
        Some((code, rate))
    }))
}

/// Format a converted amount: whole hryvnias for UAH, two decimals plus the
/// currency code otherwise.
#[must_use]
pub fn format_money(value: Decimal, currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    if code.is_empty() || code == "UAH" {
        let rounded: i64 = value.round().try_into().unwrap_or(0);
        return format_uah(rounded);
    }
    format!("{} {code}", value.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    #[test]
    fn test_rows_to_rates_skips_invalid() {
        let rows = vec![
            NbuRow {
                cc: Some("usd".to_owned()),
                rate: Decimal::from_f64(40.5),
            },
            NbuRow {
                cc: None,
                rate: Decimal::from_f64(1.0),
            },
            NbuRow {
                cc: Some("EUR".to_owned()),
                rate: None,
            },
            NbuRow {
                cc: Some("PLN".to_owned()),
                rate: Some(Decimal::ZERO),
            },
        ];

        let rates = rows_to_rates(rows);
        assert_eq!(rates.get("USD"), Decimal::from_f64(40.5));
        assert!(rates.get("EUR").is_none());
        assert!(rates.get("PLN").is_none());
        assert_eq!(rates.get("UAH"), Some(Decimal::ONE));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::from(12345), "UAH"), "12\u{a0}345\u{a0}грн");
        assert_eq!(
            format_money(Decimal::from_f64(296.2963).expect("decimal"), "usd"),
            "296.30 USD"
        );
    }
}
