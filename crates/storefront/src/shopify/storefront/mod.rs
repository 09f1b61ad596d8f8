//! Shopify Storefront API client implementation.
//!
//! Sends `graphql_client` request envelopes with `reqwest` 0.13 and decodes the
//! standard `{ data, errors }` response. Collection-scoped product lists are
//! cached with `moka` (5-minute TTL).

mod cache;
mod conversions;
pub(crate) mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{ConfigError, ShopifyStorefrontConfig};
use crate::shopify::types::{CatalogSnapshot, CollectionProducts};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::{convert_catalog, convert_collection_products};
use queries::{
    CATALOG_COLLECTION_LIMIT, CATALOG_PRODUCT_LIMIT, CatalogData, CatalogVariables,
    CollectionProductsData, CollectionProductsVariables, catalog_query, collection_products_query,
};

/// Header carrying the public Storefront access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// How much of an unexpected response body ends up in logs.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: Url,
    access_token: SecretString,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the store domain does not form a valid endpoint URL.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ConfigError> {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_endpoint()?,
                access_token: config.storefront_token.clone(),
                cache,
            }),
        })
    }

    /// Execute a GraphQL document and decode its `data`.
    pub(crate) async fn execute<V, T>(&self, body: &QueryBody<V>) -> Result<T, ShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;
        debug!(operation = body.operation_name, %status, "Storefront API responded");

        parse_graphql_response(status, &response_text)
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Fetch the bulk catalog: the first 100 products and the first 25 collections.
    ///
    /// Never cached; every call is a fresh load.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn get_catalog_snapshot(&self) -> Result<CatalogSnapshot, ShopifyError> {
        let body = catalog_query(CatalogVariables {
            product_count: CATALOG_PRODUCT_LIMIT,
            collection_count: CATALOG_COLLECTION_LIMIT,
        });

        let data: CatalogData = self.execute(&body).await?;
        let snapshot = convert_catalog(data);

        debug!(
            products = snapshot.products.len(),
            collections = snapshot.collections.len(),
            "Catalog snapshot fetched"
        );
        Ok(snapshot)
    }

    /// Fetch the products of one collection by handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no collection has this handle, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_products(
        &self,
        handle: &str,
        first: i64,
    ) -> Result<CollectionProducts, ShopifyError> {
        let cache_key = CacheKey::CollectionProducts {
            handle: handle.to_string(),
            first,
        };

        if let Some(CacheValue::CollectionProducts(collection)) =
            self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collection products");
            return Ok(*collection);
        }

        let body = collection_products_query(CollectionProductsVariables {
            handle: handle.to_string(),
            product_count: first,
        });

        let data: CollectionProductsData = self.execute(&body).await?;
        let raw = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("collection {handle}")))?;
        let collection = convert_collection_products(raw);

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::CollectionProducts(Box::new(collection.clone())),
            )
            .await;

        Ok(collection)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop every cached collection listing.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Decode a Storefront API response body.
///
/// A non-success status, a body that is not a GraphQL envelope, a non-empty
/// `errors` array, and a missing `data` member are all errors.
fn parse_graphql_response<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    response_text: &str,
) -> Result<T, ShopifyError> {
    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %truncate(response_text, LOGGED_BODY_CHARS),
            "Shopify API returned non-success status"
        );
        return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
            "HTTP {status}: {}",
            truncate(response_text, 200)
        ))]));
    }

    let response: Response<T> = match serde_json::from_str(response_text) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %truncate(response_text, LOGGED_BODY_CHARS),
                "Failed to parse Shopify GraphQL response"
            );
            return Err(ShopifyError::Parse(e));
        }
    };

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        tracing::debug!(errors = ?errors, "GraphQL errors in response");
        return Err(ShopifyError::GraphQL(
            errors.into_iter().map(convert_graphql_error).collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            body = %truncate(response_text, LOGGED_BODY_CHARS),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
    })
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
