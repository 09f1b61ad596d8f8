//! Product type conversion functions.

use kiosk_core::ProductId;

use crate::shopify::types::{CollectionRef, Product};

use super::super::queries::RawProduct;

/// Convert a raw product.
///
/// Availability is derived from the variants: a product is available when any
/// of its variants is available for sale, so a product without variants is
/// unavailable.
pub fn convert_product(product: RawProduct) -> Product {
    let available_for_sale = product.variants.edges.iter().any(|e| e.node.available_for_sale);
    let image = product.images.into_nodes().next().map(|i| i.url);

    Product {
        id: ProductId::new(product.id),
        handle: product.handle,
        title: product.title,
        description: product.description.unwrap_or_default(),
        image,
        price: product
            .price_range
            .map(|r| r.min_variant_price)
            .unwrap_or_default()
            .to_price(),
        available_for_sale,
        collections: product
            .collections
            .into_nodes()
            .map(|c| CollectionRef {
                id: c.id.into(),
                title: c.title,
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kiosk_core::CurrencyCode;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawProduct {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_any_available_variant_makes_product_available() {
        let product = convert_product(raw(json!({
            "id": "gid://shopify/Product/1",
            "title": "Protein Bar",
            "variants": { "edges": [
                { "node": { "availableForSale": false } },
                { "node": { "availableForSale": true } }
            ]}
        })));
        assert!(product.available_for_sale);
    }

    #[test]
    fn test_product_without_variants_is_unavailable() {
        let product = convert_product(raw(json!({
            "id": "gid://shopify/Product/2",
            "title": "Muesli",
            "variants": { "edges": [] }
        })));
        assert!(!product.available_for_sale);
    }

    #[test]
    fn test_price_and_image_are_extracted() {
        let product = convert_product(raw(json!({
            "id": "gid://shopify/Product/3",
            "handle": "oats",
            "title": "Oats",
            "description": "Rolled oats",
            "images": { "edges": [
                { "node": { "url": "https://cdn.example/oats-1.png" } },
                { "node": { "url": "https://cdn.example/oats-2.png" } }
            ]},
            "priceRange": { "minVariantPrice": { "amount": "199.0", "currencyCode": "INR" } },
            "collections": { "edges": [
                { "node": { "id": "gid://shopify/Collection/9", "title": "Breakfast" } }
            ]}
        })));

        assert_eq!(product.image.as_deref(), Some("https://cdn.example/oats-1.png"));
        assert_eq!(product.price.amount, Decimal::from(199));
        assert_eq!(product.price.currency_code, CurrencyCode::INR);
        assert_eq!(product.collections.len(), 1);
        assert_eq!(product.description, "Rolled oats");
    }

    #[test]
    fn test_malformed_price_normalizes_to_zero() {
        let product = convert_product(raw(json!({
            "id": "gid://shopify/Product/4",
            "title": "Mystery",
            "priceRange": { "minVariantPrice": { "amount": "call us" } }
        })));
        assert_eq!(product.price.amount, Decimal::ZERO);
        assert!(product.image.is_none());
    }
}
