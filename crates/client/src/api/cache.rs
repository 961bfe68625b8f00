//! Cache value types for the catalog cache.

use super::types::{Category, Product};

/// Values stored in the catalog cache.
///
/// Boxed where the payload is large to keep the cache entry small.
#[derive(Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Category(Box<Category>),
    Categories(Vec<Category>),
}
