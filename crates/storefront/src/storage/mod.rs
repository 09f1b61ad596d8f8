//! Persistent key-value storage.
//!
//! The cart and the customer session each live under a single key as an
//! opaque string blob. Callers own the encoding.
//!
//! ## Implementations
//!
//! - [`FileStore`]: one file per key inside a data directory.
//! - [`MemoryStore`]: for tests and ephemeral runs.
//!
//! ## Storage Layout
//!
//! ```text
//! .kiosk/
//! ├── cart.json
//! └── userToken.json
//! ```

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Key holding the serialized cart.
pub const CART_KEY: &str = "cart";
/// Key holding the customer access token.
pub const USER_TOKEN_KEY: &str = "userToken";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode stored value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Minimal string blob store.
///
/// Implementations use interior mutability so that stores can be shared
/// between the cart and the session without exclusive borrows.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Keys become file names, so only a conservative alphabet is accepted.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(CART_KEY).is_ok());
        assert!(validate_key(USER_TOKEN_KEY).is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }
}
