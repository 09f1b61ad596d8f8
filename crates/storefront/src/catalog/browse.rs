//! Shop screen state: selected category, search term and visible window.

use crate::config::BrowseConfig;
use crate::shopify::Product;

use super::{ALL_COLLECTION_TITLE, Catalog, PageWindow, filter_products};

/// What the shopper is currently looking at.
///
/// The search term held here is the *effective* one, i.e. after
/// debouncing. Changing the category or the effective term resets the
/// window to a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    category: String,
    search: String,
    window: PageWindow,
}

impl BrowseState {
    #[must_use]
    pub fn new(config: &BrowseConfig) -> Self {
        Self {
            category: ALL_COLLECTION_TITLE.to_string(),
            search: String::new(),
            window: PageWindow::new(config.page_size),
        }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn select_category(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title != self.category {
            self.category = title;
            self.window.reset();
        }
    }

    /// Apply a settled search term.
    pub fn apply_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.window.reset();
        }
    }

    /// Every product matching the current category and search.
    #[must_use]
    pub fn matches<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        filter_products(catalog, &self.category, &self.search)
    }

    /// The matching products inside the visible window.
    #[must_use]
    pub fn visible<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let mut products = self.matches(catalog);
        products.truncate(self.window.visible(products.len()));
        products
    }

    pub fn show_more(&mut self, catalog: &Catalog) {
        let total = self.matches(catalog).len();
        self.window.show_more(total);
    }

    #[must_use]
    pub fn has_more(&self, catalog: &Catalog) -> bool {
        self.window.has_more(self.matches(catalog).len())
    }

    /// Category chips: "All" followed by the catalog's collections.
    #[must_use]
    pub fn categories(catalog: &Catalog) -> Vec<&str> {
        catalog.titles().collect()
    }
}
