//! Integration tests for MebliHub.
//!
//! # Test Categories
//!
//! - In-process tests exercising cross-crate flows (filter round-trips
//!   through real URLs, cart pricing over backend-shaped payloads, order
//!   payload wiring)
//! - Live-server tests (`#[ignore]`) that need the storefront/admin binaries
//!   and the catalog API running
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests
//! cargo test -p meblihub-integration-tests
//!
//! # Live-server tests
//! STOREFRONT_BASE_URL=http://localhost:3000 \
//! ADMIN_BASE_URL=http://localhost:3001 \
//! cargo test -p meblihub-integration-tests -- --ignored
//! ```

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}
