//! Catalog loading and browsing.
//!
//! A [`Catalog`] is the list of collections shown to the shopper: a
//! synthetic "All" collection first, then every API collection that has at
//! least one product. It is rebuilt wholesale on every successful load.

mod browse;
mod debounce;
mod filter;

pub use browse::BrowseState;
pub use debounce::Debouncer;
pub use filter::{PageWindow, filter_products};

use std::collections::HashSet;
use std::future::Future;

use kiosk_core::CollectionId;
use tracing::{info, instrument, warn};

use crate::shopify::{CatalogSnapshot, Collection, Product, ShopifyError, StorefrontClient};

/// ID of the synthetic collection holding every product.
pub const ALL_COLLECTION_ID: &str = "all-products";
/// Title of the synthetic collection holding every product.
pub const ALL_COLLECTION_TITLE: &str = "All";

/// Collections available for browsing, "All" first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    all: Collection,
    collections: Vec<Collection>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            all: all_collection(Vec::new()),
            collections: Vec::new(),
        }
    }
}

fn all_collection(products: Vec<Product>) -> Collection {
    Collection {
        id: CollectionId::new(ALL_COLLECTION_ID),
        title: ALL_COLLECTION_TITLE.to_string(),
        products,
    }
}

impl Catalog {
    /// All collections, starting with "All".
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        std::iter::once(&self.all).chain(&self.collections)
    }

    /// Number of collections, including "All".
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.len() + 1
    }

    /// Never true: "All" is always present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The synthetic "All" collection.
    #[must_use]
    pub const fn all(&self) -> &Collection {
        &self.all
    }

    /// Look up a collection by exact title.
    #[must_use]
    pub fn find(&self, title: &str) -> Option<&Collection> {
        self.collections().find(|c| c.title == title)
    }

    /// Collection titles in display order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.collections().map(|c| c.title.as_str())
    }

    /// Every product, in API order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.all.products
    }

    /// Find a product by ID or handle.
    #[must_use]
    pub fn product(&self, id_or_handle: &str) -> Option<&Product> {
        self.products()
            .iter()
            .find(|p| p.id.as_str() == id_or_handle || p.handle == id_or_handle)
    }
}

/// Group a snapshot into collections.
///
/// Products are attached to every collection they reference. API
/// collections without products are dropped, as are API collections whose
/// title would shadow "All" or repeat an earlier title.
#[must_use]
pub fn build_catalog(snapshot: CatalogSnapshot) -> Catalog {
    let mut collections = Vec::with_capacity(snapshot.collections.len());
    let mut seen_titles: HashSet<String> = HashSet::new();
    seen_titles.insert(ALL_COLLECTION_TITLE.to_string());

    for collection in &snapshot.collections {
        if !seen_titles.insert(collection.title.clone()) {
            warn!(
                id = %collection.id,
                title = %collection.title,
                "Skipping collection with duplicate title"
            );
            continue;
        }

        let products: Vec<Product> = snapshot
            .products
            .iter()
            .filter(|p| p.in_collection(&collection.id))
            .cloned()
            .collect();
        if products.is_empty() {
            continue;
        }

        collections.push(Collection {
            id: collection.id.clone(),
            title: collection.title.clone(),
            products,
        });
    }

    Catalog {
        all: all_collection(snapshot.products),
        collections,
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Anything that can produce a catalog snapshot.
pub trait CatalogSource {
    /// Fetch products and collections in one request.
    fn fetch_catalog(&self) -> impl Future<Output = Result<CatalogSnapshot, ShopifyError>> + Send;
}

impl CatalogSource for StorefrontClient {
    fn fetch_catalog(&self) -> impl Future<Output = Result<CatalogSnapshot, ShopifyError>> + Send {
        self.get_catalog_snapshot()
    }
}

/// Outcome of the most recent load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing loaded yet.
    #[default]
    Idle,
    /// The last load succeeded.
    Ready,
    /// The last load failed; the catalog still holds the previous result.
    Failed { message: String },
}

/// Owns the current catalog and reloads it on demand.
#[derive(Debug)]
pub struct CatalogLoader<C> {
    source: C,
    catalog: Catalog,
    state: LoadState,
}

impl<C: CatalogSource> CatalogLoader<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            catalog: Catalog::default(),
            state: LoadState::Idle,
        }
    }

    /// Fetch and replace the catalog.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. The previous catalog is kept and the error
    /// message is recorded in [`CatalogLoader::state`].
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&Catalog, ShopifyError> {
        match self.source.fetch_catalog().await {
            Ok(snapshot) => {
                self.catalog = build_catalog(snapshot);
                self.state = LoadState::Ready;
                info!(
                    collections = self.catalog.len(),
                    products = self.catalog.products().len(),
                    "Catalog loaded"
                );
                Ok(&self.catalog)
            }
            Err(e) => {
                warn!(error = %e, "Catalog load failed");
                self.state = LoadState::Failed {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Re-run the load after a failure.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogLoader::load`].
    pub async fn retry(&mut self) -> Result<&Catalog, ShopifyError> {
        self.load().await
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// The recorded error message, if the last load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { message } => Some(message),
            LoadState::Idle | LoadState::Ready => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::shopify::{CollectionRef, GraphQLError};
    use kiosk_core::{CurrencyCode, Price, ProductId};
    use rust_decimal::Decimal;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub fn product(id: &str, title: &str, collections: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            handle: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            image: None,
            price: Price::new(Decimal::from(100), CurrencyCode::INR),
            available_for_sale: true,
            collections: collections
                .iter()
                .map(|c| CollectionRef {
                    id: CollectionId::new(*c),
                    title: c.to_uppercase(),
                })
                .collect(),
        }
    }

    pub fn collection_ref(id: &str, title: &str) -> CollectionRef {
        CollectionRef {
            id: CollectionId::new(id),
            title: title.to_string(),
        }
    }

    pub fn sample_snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            products: vec![
                product("p1", "Protein Bar", &["bars"]),
                product("p2", "Muesli", &["breakfast"]),
                product("p3", "Oats Bar", &["bars", "breakfast"]),
            ],
            collections: vec![
                collection_ref("bars", "Bars"),
                collection_ref("breakfast", "Breakfast"),
                collection_ref("empty", "Empty"),
            ],
        }
    }

    /// Replays queued results.
    struct ScriptedSource {
        results: Mutex<VecDeque<Result<CatalogSnapshot, ShopifyError>>>,
    }

    impl ScriptedSource {
        fn new(results: Vec<Result<CatalogSnapshot, ShopifyError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
            }
        }
    }

    impl CatalogSource for ScriptedSource {
        fn fetch_catalog(
            &self,
        ) -> impl Future<Output = Result<CatalogSnapshot, ShopifyError>> + Send {
            let next = self.results.lock().unwrap().pop_front();
            async move { next.unwrap() }
        }
    }

    #[test]
    fn test_all_is_first_and_empty_collections_dropped() {
        let catalog = build_catalog(sample_snapshot());
        let titles: Vec<_> = catalog.titles().collect();
        assert_eq!(titles, ["All", "Bars", "Breakfast"]);
        assert_eq!(catalog.all().id.as_str(), ALL_COLLECTION_ID);
        assert_eq!(catalog.all().products.len(), 3);
    }

    #[test]
    fn test_products_attach_to_every_referenced_collection() {
        let catalog = build_catalog(sample_snapshot());
        let bars: Vec<_> = catalog
            .find("Bars")
            .unwrap()
            .products
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        let breakfast: Vec<_> = catalog
            .find("Breakfast")
            .unwrap()
            .products
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(bars, ["p1", "p3"]);
        assert_eq!(breakfast, ["p2", "p3"]);
    }

    #[test]
    fn test_empty_snapshot_still_has_all() {
        let catalog = build_catalog(CatalogSnapshot::default());
        assert_eq!(catalog.len(), 1);
        assert!(catalog.all().products.is_empty());
    }

    #[test]
    fn test_api_collection_named_all_is_dropped() {
        let mut snapshot = sample_snapshot();
        snapshot.collections.insert(0, collection_ref("bars", "All"));
        let catalog = build_catalog(snapshot);
        assert_eq!(catalog.titles().filter(|t| *t == "All").count(), 1);
        assert_eq!(catalog.all().id.as_str(), ALL_COLLECTION_ID);
    }

    #[test]
    fn test_product_lookup_by_id_or_handle() {
        let catalog = build_catalog(sample_snapshot());
        assert_eq!(catalog.product("p2").unwrap().title, "Muesli");
        assert!(catalog.product("nope").is_none());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_catalog() {
        let source = ScriptedSource::new(vec![
            Ok(sample_snapshot()),
            Err(ShopifyError::GraphQL(vec![GraphQLError::message("Throttled")])),
            Ok(CatalogSnapshot::default()),
        ]);
        let mut loader = CatalogLoader::new(source);
        assert_eq!(loader.state(), &LoadState::Idle);

        loader.load().await.unwrap();
        assert_eq!(loader.state(), &LoadState::Ready);
        assert_eq!(loader.catalog().len(), 3);

        assert!(loader.load().await.is_err());
        assert_eq!(loader.error(), Some("Throttled"));
        assert_eq!(loader.catalog().len(), 3);

        loader.retry().await.unwrap();
        assert!(loader.error().is_none());
        assert_eq!(loader.catalog().len(), 1);
    }
}
