//! Cache types for Storefront API responses.

use crate::shopify::types::CollectionProducts;

/// Cache key for collection-scoped product lists.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    CollectionProducts { handle: String, first: i64 },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    CollectionProducts(Box<CollectionProducts>),
}
