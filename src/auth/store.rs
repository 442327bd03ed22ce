//! Credential persistence seam
//!
//! After a successful refresh the orchestrator hands the new token material
//! to a [`CredentialStore`] as key/value pairs. The storage format and
//! location belong to the caller (settings file, keychain, ...); this crate
//! only defines the seam and a simple in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Result;

/// Key under which the access token is stored
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Key under which the refresh token is stored
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Collaborator that persists refreshed credentials
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist one key/value pair
    async fn store(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory credential store
///
/// Useful in tests and for callers that persist elsewhere at shutdown.
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    /// Stored key/value pairs
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read back a stored value
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn store(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        store.store(ACCESS_TOKEN_KEY, "act.new").await.unwrap();

        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.as_deref(), Some("act.new"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).await, None);
    }

    #[tokio::test]
    async fn test_memory_store_overwrites() {
        let store = MemoryCredentialStore::new();
        store.store(ACCESS_TOKEN_KEY, "first").await.unwrap();
        store.store(ACCESS_TOKEN_KEY, "second").await.unwrap();

        assert_eq!(store.get(ACCESS_TOKEN_KEY).await.as_deref(), Some("second"));
    }
}
