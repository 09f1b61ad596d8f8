//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - `graphql_client` request/response envelopes over `reqwest`, with query
//!   documents kept next to the methods that send them
//! - Shopify is source of truth for catalog, customers and orders
//! - Collection-scoped product lists are cached in memory via `moka` (5 minute TTL);
//!   the full catalog load always goes to the network
//!
//! # Operations
//!
//! ## Catalog
//! - Bulk products + collections snapshot
//! - Products of a single collection
//!
//! ## Customer
//! - Access token creation (login), customer creation (signup)
//! - Address creation
//! - Customer detail (profile, recent orders, addresses)
//!
//! # Example
//!
//! ```rust,ignore
//! use kiosk_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify)?;
//! let snapshot = client.get_catalog_snapshot().await?;
//! let token = client.create_access_token(&email, &password).await?;
//! let customer = client.get_customer(&token.access_token).await?;
//! ```

mod customer;
mod storefront;
pub mod types;

pub use customer::*;
pub use storefront::StorefrontClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("{}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid credentials).
    #[error("{0}")]
    UserError(String),
}

impl ShopifyError {
    /// Whether the API itself rejected the request (as opposed to the
    /// transport or response shape failing).
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::GraphQL(_) | Self::UserError(_) | Self::NotFound(_))
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// Surface the first error; the rest are logged where they are received.
fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    let Some(first) = errors.first() else {
        return "GraphQL request failed (no error details provided)".to_string();
    };

    if !first.message.is_empty() {
        return first.message.clone();
    }

    let mut parts = Vec::new();
    if !first.path.is_empty() {
        let path_str = first
            .path
            .iter()
            .map(|p| match p {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        parts.push(format!("path: {path_str}"));
    }
    if let Some(loc) = first.locations.first() {
        parts.push(format!("at line {}:{}", loc.line, loc.column));
    }

    if parts.is_empty() {
        "GraphQL request failed (no details)".to_string()
    } else {
        format!("GraphQL error {}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("collection bars".to_string());
        assert_eq!(err.to_string(), "Not found: collection bars");
    }

    #[test]
    fn test_graphql_error_surfaces_first_message() {
        let errors = vec![
            GraphQLError::message("Field 'prodcts' doesn't exist on type 'QueryRoot'"),
            GraphQLError::message("Invalid ID"),
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "Field 'prodcts' doesn't exist on type 'QueryRoot'"
        );
    }

    #[test]
    fn test_graphql_error_empty_message_uses_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("products".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL error path: products.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL request failed (no error details provided)"
        );
    }

    #[test]
    fn test_user_error_is_bare_message() {
        let err = ShopifyError::UserError("Unidentified customer".to_string());
        assert_eq!(err.to_string(), "Unidentified customer");
        assert!(err.is_api_error());
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
        assert!(!err.is_api_error());
    }
}
