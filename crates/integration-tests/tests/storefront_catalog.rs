//! Catalog tests against a live store.
//!
//! Run with: cargo test -p kiosk-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use kiosk_integration_tests::live_state;
use kiosk_storefront::catalog::{ALL_COLLECTION_TITLE, LoadState};

#[tokio::test]
#[ignore = "Requires Shopify storefront credentials"]
async fn test_catalog_loads_with_all_first() {
    let mut state = live_state();
    let catalog = state
        .catalog_mut()
        .load()
        .await
        .expect("Failed to load catalog");

    let first = catalog.collections().next().expect("Catalog has no collections");
    assert_eq!(first.title, ALL_COLLECTION_TITLE);
    assert_eq!(first.products.len(), catalog.products().len());

    for collection in catalog.collections().skip(1) {
        assert!(!collection.products.is_empty(), "{} is empty", collection.title);
    }
    assert_eq!(state.catalog().state(), &LoadState::Ready);
}

#[tokio::test]
#[ignore = "Requires Shopify storefront credentials"]
async fn test_prices_are_never_negative() {
    let mut state = live_state();
    let catalog = state.catalog_mut().load().await.expect("Failed to load catalog");

    for product in catalog.products() {
        assert!(
            !product.price.amount.is_sign_negative(),
            "{} has a negative price",
            product.title
        );
    }
}

#[tokio::test]
#[ignore = "Requires Shopify storefront credentials"]
async fn test_browse_first_page_is_bounded() {
    let mut state = live_state();
    state.catalog_mut().load().await.expect("Failed to load catalog");

    let browse = state.browse();
    let catalog = state.catalog().catalog();
    let visible = browse.visible(catalog);
    assert!(visible.len() <= state.config().browse.page_size);
    assert_eq!(
        browse.has_more(catalog),
        catalog.products().len() > visible.len()
    );
}

#[tokio::test]
#[ignore = "Requires Shopify storefront credentials"]
async fn test_unknown_collection_handle_is_not_found() {
    let state = live_state();
    let result = state
        .storefront()
        .get_collection_products("kiosk-no-such-collection", 6)
        .await;

    assert!(matches!(
        result,
        Err(kiosk_storefront::shopify::ShopifyError::NotFound(_))
    ));
}
