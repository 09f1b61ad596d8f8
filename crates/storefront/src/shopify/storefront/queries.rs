//! GraphQL documents and raw response shapes for the Storefront API.
//!
//! Response structs mirror the query selections one-to-one and are only
//! consumed by `conversions`.

use graphql_client::QueryBody;
use serde::{Deserialize, Serialize};

use crate::shopify::types::Money;

/// Products fetched by the bulk catalog query.
pub const CATALOG_PRODUCT_LIMIT: i64 = 100;
/// Collections fetched by the bulk catalog query.
pub const CATALOG_COLLECTION_LIMIT: i64 = 25;

macro_rules! product_fields {
    () => {
        r"
        fragment ProductFields on Product {
            id
            handle
            title
            description
            images(first: 1) {
                edges { node { url } }
            }
            priceRange {
                minVariantPrice { amount currencyCode }
            }
            variants(first: 10) {
                edges { node { availableForSale } }
            }
            collections(first: 10) {
                edges { node { id title } }
            }
        }
        "
    };
}

const CATALOG_QUERY: &str = concat!(
    r"
    query GetCatalog($productCount: Int!, $collectionCount: Int!) {
        products(first: $productCount) {
            edges { node { ...ProductFields } }
        }
        collections(first: $collectionCount) {
            edges { node { id title } }
        }
    }
    ",
    product_fields!()
);

const COLLECTION_PRODUCTS_QUERY: &str = concat!(
    r"
    query GetCollectionProducts($handle: String!, $productCount: Int!) {
        collection(handle: $handle) {
            id
            handle
            title
            products(first: $productCount) {
                edges { node { ...ProductFields } }
            }
        }
    }
    ",
    product_fields!()
);

// =============================================================================
// Variables
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVariables {
    pub product_count: i64,
    pub collection_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProductsVariables {
    pub handle: String,
    pub product_count: i64,
}

pub fn catalog_query(variables: CatalogVariables) -> QueryBody<CatalogVariables> {
    QueryBody {
        variables,
        query: CATALOG_QUERY,
        operation_name: "GetCatalog",
    }
}

pub fn collection_products_query(
    variables: CollectionProductsVariables,
) -> QueryBody<CollectionProductsVariables> {
    QueryBody {
        variables,
        query: COLLECTION_PRODUCTS_QUERY,
        operation_name: "GetCollectionProducts",
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Relay-style connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub products: Connection<RawProduct>,
    #[serde(default)]
    pub collections: Connection<RawCollectionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionProductsData {
    pub collection: Option<RawCollection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCollection {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub products: Connection<RawProduct>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: String,
    #[serde(default)]
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Connection<RawImage>,
    #[serde(default)]
    pub price_range: Option<RawPriceRange>,
    #[serde(default)]
    pub variants: Connection<RawVariant>,
    #[serde(default)]
    pub collections: Connection<RawCollectionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImage {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriceRange {
    pub min_variant_price: Money,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVariant {
    #[serde(default)]
    pub available_for_sale: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCollectionRef {
    pub id: String,
    pub title: String,
}
