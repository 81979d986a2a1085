//! Catalog API client.
//!
//! # Architecture
//!
//! - The external MebliHub backend is the source of truth - NO local sync,
//!   direct REST calls per request
//! - In-memory caching via `moka` for read-mostly catalog data (5 minute TTL)
//! - Authenticated calls pass the user's bearer token from the session;
//!   the storefront itself holds no credentials for the backend
//!
//! # Example
//!
//! ```rust,ignore
//! use meblihub_storefront::api::CatalogClient;
//!
//! let client = CatalogClient::new(&config.api);
//!
//! // Browse the catalog
//! let products = client.filter_products(&filters.to_api_params(&base)).await?;
//!
//! // Work with a user's cart
//! let cart = client.add_to_cart(&token, &product_id, 2).await?;
//! ```

mod cache;
mod client;
pub mod conversions;
pub mod types;

pub use client::CatalogClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bearer token missing, expired, or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}
