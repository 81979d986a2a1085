//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::api::CatalogClient;
use crate::config::StorefrontConfig;
use crate::services::RateProvider;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the session-store pool, the catalog API
/// client, and the exchange-rate provider.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    api: CatalogClient,
    rates: RateProvider,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let api = CatalogClient::new(&config.api);
        let rates = RateProvider::new(config.nbu_rates_url.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                api,
                rates,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn api(&self) -> &CatalogClient {
        &self.inner.api
    }

    /// Get a reference to the exchange-rate provider.
    #[must_use]
    pub fn rates(&self) -> &RateProvider {
        &self.inner.rates
    }
}
