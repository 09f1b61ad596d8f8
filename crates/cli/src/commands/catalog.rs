//! Catalog listing and one-shot browsing.

use kiosk_storefront::catalog::{BrowseState, Catalog};
use kiosk_storefront::error::Result;
use kiosk_storefront::shopify::Product;
use kiosk_storefront::state::AppState;
use tracing::warn;

/// Load the catalog, retrying up to `retries` more times on failure.
///
/// # Errors
///
/// Returns the last load error once attempts run out.
pub async fn ensure_loaded(state: &mut AppState, retries: u32) -> Result<()> {
    let loader = state.catalog_mut();
    let mut last = match loader.load().await {
        Ok(_) => return Ok(()),
        Err(e) => e,
    };

    for attempt in 1..=retries {
        warn!(attempt, error = %last, "Catalog load failed, retrying");
        last = match loader.retry().await {
            Ok(_) => return Ok(()),
            Err(e) => e,
        };
    }

    Err(last.into())
}

/// Print every collection with its product count.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(state: &mut AppState, retries: u32) -> Result<()> {
    ensure_loaded(state, retries).await?;
    let catalog = state.catalog().catalog();

    for collection in catalog.collections() {
        println!("{:<24} {:>4}", collection.title, collection.products.len());
    }
    Ok(())
}

/// Print the visible products for a category and search term.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn browse(
    state: &mut AppState,
    retries: u32,
    category: &str,
    search: &str,
    more: u32,
) -> Result<()> {
    ensure_loaded(state, retries).await?;

    let mut browse = state.browse();
    let catalog = state.catalog().catalog();

    if catalog.find(category).is_none() {
        warn!(category, "Unknown category, showing all products");
    }
    browse.select_category(category);
    browse.apply_search(search);
    for _ in 0..more {
        browse.show_more(catalog);
    }

    print_view(&browse, catalog);
    Ok(())
}

/// Print one collection's products, fetched by handle.
///
/// # Errors
///
/// Returns an error if the collection does not exist or the request fails.
pub async fn collection(state: &AppState, handle: &str, first: i64) -> Result<()> {
    let collection = state
        .storefront()
        .get_collection_products(handle, first)
        .await?;

    println!("{} ({} products)", collection.title, collection.products.len());
    for product in &collection.products {
        print_product(product);
    }
    Ok(())
}

/// Print the current browse view.
pub fn print_view(browse: &BrowseState, catalog: &Catalog) {
    println!("Categories: {}", BrowseState::categories(catalog).join(" | "));
    println!("[{}] {}", browse.category(), browse.search());

    let visible = browse.visible(catalog);
    if visible.is_empty() {
        println!("No products found");
        return;
    }

    for product in &visible {
        print_product(product);
    }

    let remaining = browse.matches(catalog).len().saturating_sub(visible.len());
    if browse.has_more(catalog) {
        println!("... {remaining} more");
    }
}

fn print_product(product: &Product) {
    let sold_out = if product.available_for_sale {
        ""
    } else {
        " (sold out)"
    };
    println!(
        "{:<40} {:>12}{sold_out}  [{}]",
        product.title,
        product.price.display(),
        product.handle
    );
}
