//! Unified error handling with Sentry integration.
//!
//! Front ends return `Result<T, AppError>` and call [`AppError::report`] once
//! at the top, which captures server-class errors to Sentry and yields the
//! message to show the shopper.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::account::AccountError;
use crate::services::checkout::CheckoutError;
use crate::shopify::ShopifyError;
use crate::storage::StorageError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Login, signup or account query failed.
    #[error("{0}")]
    Account(#[from] AccountError),

    /// Checkout form or cart was rejected.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// Local storage failed where it could not be ignored.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Terminal or other local I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the shopper.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error points at a fault outside the shopper's control.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) | Self::Io(_) => true,
            Self::Shopify(err) | Self::Account(AccountError::Shopify(err)) => !err.is_api_error(),
            Self::Account(_) | Self::Checkout(_) | Self::NotFound(_) | Self::BadRequest(_) => {
                false
            }
        }
    }

    /// Log the error, capture server-class errors to Sentry, and return the
    /// message to show.
    #[must_use]
    pub fn report(&self) -> String {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation failed"
            );
        } else {
            tracing::debug!(error = %self, "Operation rejected");
        }

        match self {
            Self::Shopify(ShopifyError::RateLimited(secs))
            | Self::Account(AccountError::Shopify(ShopifyError::RateLimited(secs))) => {
                format!("Too many requests, try again in {secs} seconds")
            }
            Self::Shopify(err) | Self::Account(AccountError::Shopify(err))
                if !err.is_api_error() =>
            {
                "External service error".to_string()
            }
            Self::Shopify(err) | Self::Account(AccountError::Shopify(err)) => err.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful login to associate errors with the customer.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the customer.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "gid://shopify/Product/1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::account::{Field, FieldErrors};
    use crate::shopify::GraphQLError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("quantity must be a number".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity must be a number");
    }

    #[test]
    fn test_shopper_errors_are_not_server_errors() {
        let mut fields = FieldErrors::new();
        fields.push(Field::Email, "Email is invalid");
        let err = AppError::from(AccountError::Validation(fields));
        assert!(!err.is_server_error());
        assert_eq!(err.report(), "Email is invalid");

        let err = AppError::from(CheckoutError::EmptyCart);
        assert!(!err.is_server_error());
        assert_eq!(err.report(), "Cart is empty");
    }

    #[test]
    fn test_api_rejections_surface_shopify_message() {
        let err = AppError::from(AccountError::Shopify(ShopifyError::UserError(
            "Unidentified customer".to_string(),
        )));
        assert!(!err.is_server_error());
        assert_eq!(err.report(), "Unidentified customer");

        let err = AppError::from(ShopifyError::GraphQL(vec![GraphQLError::message(
            "Throttled",
        )]));
        assert_eq!(err.report(), "Throttled");
    }

    #[test]
    fn test_transport_errors_are_hidden() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(ShopifyError::Parse(parse));
        assert!(err.is_server_error());
        assert_eq!(err.report(), "External service error");

        let err = AppError::from(ShopifyError::RateLimited(3));
        assert_eq!(err.report(), "Too many requests, try again in 3 seconds");
    }
}
