//! Conversions from raw Storefront API responses to domain types.
//!
//! Prices pass through the price normalizer here and nowhere else on the
//! catalog path.

mod collections;
mod products;

pub use collections::{convert_catalog, convert_collection_products};
pub use products::convert_product;
