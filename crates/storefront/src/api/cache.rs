//! Cache value types for catalog API responses.

use super::types::{Category, Location, Product};

/// Cached value types, one per cacheable read.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
    Locations(Vec<Location>),
    Translations(serde_json::Value),
}
