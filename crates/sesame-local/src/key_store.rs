//! In-memory key-value store.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use sesame_core::traits::KeyStore;
use sesame_core::Result;

/// An in-memory [`KeyStore`].
///
/// Cheap to clone; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryKeyStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().unwrap().keys().cloned().collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove_round_trip() {
        let store = MemoryKeyStore::new();
        assert!(store.is_empty());

        store.set("sb-project-session", "{}").await.unwrap();
        store.set("theme", "dark").await.unwrap();

        assert_eq!(
            store.get("sb-project-session").await.unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(store.len(), 2);

        store
            .remove(&["sb-project-session".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["theme".to_string()]);
        assert_eq!(store.len(), 1);
    }
}
