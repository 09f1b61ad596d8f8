//! Local, persistent shopping cart.
//!
//! The cart is an insertion-ordered map from product ID to line item. The
//! in-memory map is the source of truth; every mutation writes the whole
//! cart to storage under [`CART_KEY`]. Storage failures never fail a cart
//! operation: they are logged and the in-memory state carries on.

use indexmap::IndexMap;
use kiosk_core::{CurrencyCode, LinePrice, Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error, warn};

use crate::shopify::Product;
use crate::storage::{CART_KEY, KeyValueStore};

/// One product's cart entry.
///
/// The product fields are a snapshot taken at first add; `price` is the
/// normalized price captured at that moment and is never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub price: LinePrice,
    /// Always at least 1.
    #[serde(default = "one", deserialize_with = "deserialize_quantity")]
    pub quantity: u32,
}

impl CartLineItem {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            currency_code: product.price.currency_code.clone(),
            price: LinePrice::from(&product.price),
            quantity: 1,
        }
    }

    /// Unit price with currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::new(self.price.amount, self.currency_code.clone())
    }

    /// `price × quantity`, or `None` if the product overflows a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price
            .amount
            .checked_mul(Decimal::from(self.quantity.max(1)))
    }
}

const fn one() -> u32 {
    1
}

/// Accept any JSON number and clamp it into `1..=u32::MAX`.
#[allow(clippy::cast_possible_truncation)]
fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let quantity = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.trunc() as i64))
        .unwrap_or(1);
    Ok(clamp_quantity(quantity))
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

/// The cart, bound to the store it persists into.
///
/// Only [`CartStore::restore`] constructs one, so no mutation can happen
/// before the persisted cart has been loaded.
#[derive(Debug)]
pub struct CartStore<S> {
    items: IndexMap<ProductId, CartLineItem>,
    storage: S,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Load the persisted cart.
    ///
    /// A missing, unreadable or corrupt cart yields an empty cart.
    pub fn restore(storage: S) -> Self {
        let items = match storage.get(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(lines) => {
                    let mut items = IndexMap::with_capacity(lines.len());
                    for line in lines {
                        // Duplicate IDs in old data: first one wins.
                        items.entry(line.id.clone()).or_insert(line);
                    }
                    items
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable persisted cart");
                    IndexMap::new()
                }
            },
            Ok(None) => IndexMap::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load cart, starting empty");
                IndexMap::new()
            }
        };

        debug!(lines = items.len(), "Cart restored");
        Self { items, storage }
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart keeps its captured price; only the
    /// quantity grows.
    pub fn add_to_cart(&mut self, product: &Product) {
        self.items
            .entry(product.id.clone())
            .and_modify(|line| line.quantity = line.quantity.saturating_add(1))
            .or_insert_with(|| CartLineItem::from_product(product));
        self.persist();
    }

    /// Remove a line. Unknown IDs are ignored.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        if self.items.shift_remove(id).is_some() {
            self.persist();
        }
    }

    /// Set a line's quantity. Zero or less removes the line; unknown IDs are ignored.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);
            return;
        }
        if let Some(line) = self.items.get_mut(id) {
            line.quantity = clamp_quantity(quantity);
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.items.values().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price × quantity` over all lines.
    ///
    /// Lines whose total does not fit in a `Decimal` are left out.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.values().fold(Decimal::ZERO, |total, line| {
            match line.line_total().and_then(|amount| total.checked_add(amount)) {
                Some(sum) => sum,
                None => {
                    warn!(id = %line.id, "Cart line total overflows, leaving it out");
                    total
                }
            }
        })
    }

    /// Currency of the cart, taken from the first line.
    #[must_use]
    pub fn currency_code(&self) -> CurrencyCode {
        self.items
            .values()
            .next()
            .map(|line| line.currency_code.clone())
            .unwrap_or_default()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.values()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) {
        let lines: Vec<&CartLineItem> = self.items.values().collect();
        let result = serde_json::to_string(&lines)
            .map_err(crate::storage::StorageError::from)
            .and_then(|raw| self.storage.set(CART_KEY, &raw));
        if let Err(e) = result {
            error!(error = %e, "Failed to save cart");
        }
    }
}
