//! Application state owned by a front end.
//!
//! One `AppState` per process. It owns the cart and the session outright;
//! mutations go through `&mut self`, so there is never more than one writer.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{BrowseState, CatalogLoader, Debouncer};
use crate::config::{ConfigError, StorefrontConfig};
use crate::services::account::AccountService;
use crate::services::checkout::{CheckoutError, CheckoutForm, OrderReceipt, place_order};
use crate::session::SessionStore;
use crate::shopify::StorefrontClient;
use crate::storage::{FileStore, KeyValueStore};

/// Storage shared by the cart and the session.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Everything a front end needs: configuration, API client, catalog, cart
/// and session.
pub struct AppState {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    catalog: CatalogLoader<StorefrontClient>,
    cart: CartStore<SharedStore>,
    session: SessionStore<SharedStore>,
}

impl AppState {
    /// Create state backed by files in the configured data directory.
    ///
    /// The persisted cart is restored before this returns.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the Shopify endpoint cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ConfigError> {
        let storage: SharedStore = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create state over any store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the Shopify endpoint cannot be built.
    pub fn with_storage(config: StorefrontConfig, storage: SharedStore) -> Result<Self, ConfigError> {
        let storefront = StorefrontClient::new(&config.shopify)?;
        Ok(Self {
            catalog: CatalogLoader::new(storefront.clone()),
            cart: CartStore::restore(Arc::clone(&storage)),
            session: SessionStore::new(storage),
            storefront,
            config,
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub const fn storefront(&self) -> &StorefrontClient {
        &self.storefront
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogLoader<StorefrontClient> {
        &self.catalog
    }

    pub const fn catalog_mut(&mut self) -> &mut CatalogLoader<StorefrontClient> {
        &mut self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<SharedStore> {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore<SharedStore> {
        &mut self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore<SharedStore> {
        &self.session
    }

    /// Account operations over this state's client and session.
    #[must_use]
    pub const fn accounts(&self) -> AccountService<'_, SharedStore> {
        AccountService::new(&self.storefront, &self.session)
    }

    /// Fresh browse state using the configured page size.
    #[must_use]
    pub fn browse(&self) -> BrowseState {
        BrowseState::new(&self.config.browse)
    }

    /// A debouncer for search input using the configured quiet period.
    #[must_use]
    pub fn search_debouncer(&self) -> Debouncer<String> {
        Debouncer::new(self.config.browse.search_debounce)
    }

    /// Place an order from the current cart.
    ///
    /// # Errors
    ///
    /// Returns the first checkout rule that fails.
    pub fn place_order(&mut self, form: &CheckoutForm) -> Result<OrderReceipt, CheckoutError> {
        place_order(&mut self.cart, form)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{BrowseConfig, DEFAULT_API_VERSION, ShopifyStorefrontConfig};
    use crate::storage::{CART_KEY, MemoryStore};
    use secrecy::SecretString;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            shopify: ShopifyStorefrontConfig {
                store: "kiosk-test.myshopify.com".to_string(),
                api_version: DEFAULT_API_VERSION.to_string(),
                storefront_token: SecretString::from("0fe2390a1ccce18eb5a0e8f514456fac"),
            },
            data_dir: ".kiosk-test".into(),
            browse: BrowseConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_state_restores_cart_from_storage() {
        let storage: SharedStore = Arc::new(MemoryStore::new());
        storage
            .set(CART_KEY, r#"[{"id": "p1", "title": "Bar", "price": {"amount": 50}, "quantity": 2}]"#)
            .unwrap();

        let state = AppState::with_storage(config(), storage).unwrap();
        assert_eq!(state.cart().cart_count(), 2);
        assert!(!state.session().is_logged_in());
        assert_eq!(state.browse().category(), "All");
    }

    #[test]
    fn test_file_backed_state_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config();
        cfg.data_dir = dir.path().to_path_buf();

        let state = AppState::new(cfg).unwrap();
        assert!(state.cart().is_empty());
        assert_eq!(state.search_debouncer().delay(), BrowseConfig::default().search_debounce);
    }
}
