//! Persisted customer session.
//!
//! The session is nothing more than the customer access token, stored under
//! [`USER_TOKEN_KEY`]. No token means anonymous; that is never an error.

use secrecy::{ExposeSecret, SecretString};
use tracing::{error, warn};

use crate::storage::{KeyValueStore, USER_TOKEN_KEY};

/// Reads and writes the customer access token.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The stored token, if any. Storage failures degrade to anonymous.
    #[must_use]
    pub fn load(&self) -> Option<SecretString> {
        match self.storage.get(USER_TOKEN_KEY) {
            Ok(token) => token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Whether a token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.load().is_some()
    }

    /// Persist a token, replacing any previous one.
    pub fn save(&self, token: &SecretString) {
        if let Err(e) = self.storage.set(USER_TOKEN_KEY, token.expose_secret()) {
            error!(error = %e, "Failed to save session token");
        }
    }

    /// Forget the token.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(USER_TOKEN_KEY) {
            error!(error = %e, "Failed to clear session token");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_no_token_is_anonymous() {
        let session = SessionStore::new(MemoryStore::new());
        assert!(session.load().is_none());
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_save_load_clear() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(Arc::clone(&storage));

        session.save(&SecretString::from("tok_123"));
        assert_eq!(session.load().unwrap().expose_secret(), "tok_123");
        assert_eq!(storage.get(USER_TOKEN_KEY).unwrap().as_deref(), Some("tok_123"));

        session.clear();
        assert!(session.load().is_none());
    }

    #[test]
    fn test_blank_token_is_anonymous() {
        let storage = MemoryStore::new();
        storage.set(USER_TOKEN_KEY, "  ").unwrap();
        assert!(SessionStore::new(storage).load().is_none());
    }
}
