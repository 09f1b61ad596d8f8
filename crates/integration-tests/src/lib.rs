//! Integration tests for Kiosk.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a development store
//! export SHOPIFY_STORE=your-dev-store.myshopify.com
//! export SHOPIFY_STOREFRONT_TOKEN=...
//!
//! # Run the ignored live-store tests
//! cargo test -p kiosk-integration-tests -- --ignored
//! ```
//!
//! Tests build an [`AppState`] over in-memory storage so they never touch
//! the shopper's persisted cart or session.

use std::sync::Arc;

use kiosk_storefront::config::StorefrontConfig;
use kiosk_storefront::state::{AppState, SharedStore};
use kiosk_storefront::storage::MemoryStore;

/// Load configuration for the live store.
///
/// # Panics
///
/// Panics if the store variables are missing or invalid.
#[must_use]
#[allow(clippy::expect_used)]
pub fn live_config() -> StorefrontConfig {
    StorefrontConfig::from_env().expect("SHOPIFY_STORE and SHOPIFY_STOREFRONT_TOKEN must be set")
}

/// App state for the live store with throwaway storage.
///
/// # Panics
///
/// Panics if the configuration cannot be loaded.
#[must_use]
#[allow(clippy::expect_used)]
pub fn live_state() -> AppState {
    let storage: SharedStore = Arc::new(MemoryStore::new());
    AppState::with_storage(live_config(), storage).expect("Failed to build app state")
}
