//! MebliHub Core - Shared types library.
//!
//! This crate provides common types used across all MebliHub components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for migrations and catalog import
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. All entities are owned by the external catalog API;
//! what lives here are the client-side representations and the arithmetic that
//! operates on them (localized text, hryvnia price math, statuses).
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, localized text, money math, statuses, contacts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
