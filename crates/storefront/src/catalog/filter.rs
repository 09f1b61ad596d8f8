//! Category and search filtering with a growing visible window.

use std::collections::HashSet;

use crate::shopify::Product;

use super::Catalog;

/// Products of `category` whose title contains `search`, case-insensitively.
///
/// An unknown category falls back to "All". An empty search term matches
/// everything; any other term is matched as typed, whitespace included. Each product appears at most once, in collection order.
#[must_use]
pub fn filter_products<'a>(catalog: &'a Catalog, category: &str, search: &str) -> Vec<&'a Product> {
    let collection = catalog.find(category).unwrap_or_else(|| catalog.all());
    let needle = search.to_lowercase();

    let mut seen = HashSet::new();
    collection
        .products
        .iter()
        .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
        .filter(|p| seen.insert(p.id.as_str()))
        .collect()
}

/// How many filtered products are visible.
///
/// Starts at one page; "show more" adds a page, never past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page_size: usize,
    visible: usize,
}

impl PageWindow {
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            page_size,
            visible: page_size,
        }
    }

    /// Back to one page.
    pub const fn reset(&mut self) {
        self.visible = self.page_size;
    }

    /// Grow by one page, capped at `total`.
    pub fn show_more(&mut self, total: usize) {
        self.visible = (self.visible + self.page_size).min(total.max(self.page_size));
    }

    /// Number of items to show out of `total`.
    #[must_use]
    pub fn visible(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    /// Whether "show more" would reveal anything.
    #[must_use]
    pub const fn has_more(&self, total: usize) -> bool {
        self.visible < total
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}
