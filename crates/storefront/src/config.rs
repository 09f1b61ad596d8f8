//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_TOKEN` - Storefront API access token
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-01)
//! - `KIOSK_DATA_DIR` - Directory for the persisted cart and session (default: .kiosk)
//! - `KIOSK_PAGE_SIZE` - Products revealed per "show more" (default: 6)
//! - `KIOSK_SEARCH_DEBOUNCE_MS` - Search quiet period in milliseconds (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default Storefront API version.
pub const DEFAULT_API_VERSION: &str = "2024-01";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Directory holding the persisted key-value files
    pub data_dir: PathBuf,
    /// Product browsing behaviour
    pub browse: BrowseConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Storefront API access token
    pub storefront_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_token", &"[REDACTED]")
            .finish()
    }
}

/// Catalog browsing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Initial visible product count, and the "show more" increment
    pub page_size: usize,
    /// Quiet period before a typed search term takes effect
    pub search_debounce: Duration,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            search_debounce: Duration::from_millis(500),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let shopify = ShopifyStorefrontConfig::from_env()?;
        let browse = BrowseConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("KIOSK_DATA_DIR", ".kiosk"));

        Ok(Self {
            shopify,
            data_dir,
            browse,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ShopifyStorefrontConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let store = get_required_env("SHOPIFY_STORE")?;
        let api_version = get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION);
        let config = Self {
            store,
            api_version,
            storefront_token: get_validated_secret("SHOPIFY_STOREFRONT_TOKEN")?,
        };
        // Fail at startup rather than on the first request.
        config.graphql_endpoint()?;
        Ok(config)
    }

    /// The Storefront API GraphQL endpoint for this store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the store domain does not form a valid URL.
    pub fn graphql_endpoint(&self) -> Result<Url, ConfigError> {
        let store = self
            .store
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/');
        Url::parse(&format!(
            "https://{store}/api/{}/graphql.json",
            self.api_version
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("SHOPIFY_STORE".to_string(), e.to_string()))
    }
}

impl BrowseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let page_size = match get_optional_env("KIOSK_PAGE_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "KIOSK_PAGE_SIZE".to_string(),
                        format!("expected a positive integer, got '{raw}'"),
                    )
                })?,
            None => defaults.page_size,
        };
        let search_debounce = match get_optional_env("KIOSK_SEARCH_DEBOUNCE_MS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_millis).map_err(|e| {
                ConfigError::InvalidEnvVar("KIOSK_SEARCH_DEBOUNCE_MS".to_string(), e.to_string())
            })?,
            None => defaults.search_debounce,
        };
        Ok(Self {
            page_size,
            search_debounce,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Storefront tokens are 32 hex chars, comfortably above this floor.
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the token from the Shopify admin."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shopify_config(store: &str) -> ShopifyStorefrontConfig {
        ShopifyStorefrontConfig {
            store: store.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            storefront_token: SecretString::from("0fe2390a1ccce18eb5a0e8f514456fac"),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-storefront-token", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_hex_token() {
        let result = validate_secret_strength("0fe2390a1ccce18eb5a0e8f514456fac", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_graphql_endpoint() {
        let endpoint = shopify_config("yogabar-clone.myshopify.com")
            .graphql_endpoint()
            .unwrap();
        assert_eq!(
            endpoint.as_str(),
            "https://yogabar-clone.myshopify.com/api/2024-01/graphql.json"
        );
    }

    #[test]
    fn test_graphql_endpoint_tolerates_scheme_and_slash() {
        let endpoint = shopify_config("https://shop.myshopify.com/")
            .graphql_endpoint()
            .unwrap();
        assert_eq!(endpoint.host_str(), Some("shop.myshopify.com"));
    }

    #[test]
    fn test_graphql_endpoint_rejects_garbage() {
        let result = shopify_config("not a host").graphql_endpoint();
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_browse_defaults() {
        let browse = BrowseConfig::default();
        assert_eq!(browse.page_size, 6);
        assert_eq!(browse.search_debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_shopify_config_debug_redacts_token() {
        let debug_output = format!("{:?}", shopify_config("test.myshopify.com"));
        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("0fe2390a1ccce18eb5a0e8f514456fac"));
    }
}
