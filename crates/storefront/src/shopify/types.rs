//! Domain types for the Shopify Storefront API catalog.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! response shapes in `storefront::queries`. Prices are already normalized
//! by the time a [`Product`] exists.

use serde::{Deserialize, Serialize};

use kiosk_core::{CollectionId, CurrencyCode, Price, ProductId};

// =============================================================================
// Money
// =============================================================================

/// Money as sent by the API.
///
/// `amount` is left untyped: it is a decimal string in practice, but only the
/// price normalizer decides what it means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(default)]
    pub amount: serde_json::Value,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl Money {
    /// Normalize into a [`Price`]. A missing currency defaults to INR.
    #[must_use]
    pub fn to_price(&self) -> Price {
        let currency = self
            .currency_code
            .as_deref()
            .map(CurrencyCode::from)
            .unwrap_or_default();
        Price::normalized(&self.amount, currency)
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// Reference from a product to a collection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    /// Collection ID.
    pub id: CollectionId,
    /// Collection title.
    pub title: String,
}

/// A product in the store.
///
/// Immutable once fetched; a catalog reload replaces every product wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// First product image URL.
    pub image: Option<String>,
    /// Lowest variant price, normalized.
    pub price: Price,
    /// Whether any variant is available for sale.
    pub available_for_sale: bool,
    /// Collections this product belongs to.
    pub collections: Vec<CollectionRef>,
}

impl Product {
    /// Whether the product belongs to the given collection.
    #[must_use]
    pub fn in_collection(&self, id: &CollectionId) -> bool {
        self.collections.iter().any(|c| &c.id == id)
    }
}

// =============================================================================
// Collection Types
// =============================================================================

/// A named grouping of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection ID.
    pub id: CollectionId,
    /// Collection title (unique within a catalog snapshot).
    pub title: String,
    /// Products in API order.
    pub products: Vec<Product>,
}

/// A collection's products as returned by the collection-scoped query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionProducts {
    /// Collection ID.
    pub id: CollectionId,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Products in API order.
    pub products: Vec<Product>,
}

/// Everything the bulk catalog query returns, before it is grouped.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Products, each knowing which collections it belongs to.
    pub products: Vec<Product>,
    /// Collections in API order (id + title only).
    pub collections: Vec<CollectionRef>,
}
