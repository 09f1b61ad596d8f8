//! Collection and catalog conversion functions.

use kiosk_core::CollectionId;

use crate::shopify::types::{CatalogSnapshot, CollectionProducts, CollectionRef};

use super::super::queries::{CatalogData, RawCollection};
use super::convert_product;

/// Convert the bulk catalog response.
pub fn convert_catalog(data: CatalogData) -> CatalogSnapshot {
    CatalogSnapshot {
        products: data.products.into_nodes().map(convert_product).collect(),
        collections: data
            .collections
            .into_nodes()
            .map(|c| CollectionRef {
                id: CollectionId::new(c.id),
                title: c.title,
            })
            .collect(),
    }
}

/// Convert a collection-scoped product listing.
pub fn convert_collection_products(collection: RawCollection) -> CollectionProducts {
    CollectionProducts {
        id: CollectionId::new(collection.id),
        handle: collection.handle,
        title: collection.title,
        products: collection
            .products
            .into_nodes()
            .map(convert_product)
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_collection_products_keeps_api_order() {
        let raw: RawCollection = serde_json::from_value(json!({
            "id": "gid://shopify/Collection/7",
            "handle": "bars",
            "title": "Bars",
            "products": { "edges": [
                { "node": { "id": "gid://shopify/Product/2", "title": "Second" } },
                { "node": { "id": "gid://shopify/Product/1", "title": "First" } }
            ]}
        }))
        .unwrap();

        let collection = convert_collection_products(raw);
        assert_eq!(collection.handle, "bars");
        let titles: Vec<_> = collection.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Second", "First"]);
    }

    #[test]
    fn test_convert_catalog_with_missing_sections() {
        let data: CatalogData = serde_json::from_value(json!({})).unwrap();
        let snapshot = convert_catalog(data);
        assert!(snapshot.products.is_empty());
        assert!(snapshot.collections.is_empty());
    }
}
