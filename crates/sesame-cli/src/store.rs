//! File-backed key-value store.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use directories::ProjectDirs;

use sesame_core::error::StorageError;
use sesame_core::traits::KeyStore;
use sesame_core::Result;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// A [`KeyStore`] persisted as a JSON map on disk.
///
/// Plays the role the platform key-value storage layer plays in a mobile
/// client: session material and other small values live here, and the
/// context's sign-out sweep removes the auth-related keys.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    /// Open the store at the default platform data location.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "sesame")
            .ok_or_else(|| StorageError::new("could not determine data directory"))?;

        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir)
            .map_err(|e| StorageError::new(format!("failed to create data directory: {e}")))?;

        Ok(Self {
            path: data_dir.join("store.json"),
        })
    }

    /// Open a store backed by a specific file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let json = fs::read_to_string(&self.path)
            .map_err(|e| StorageError::new(format!("failed to read store file: {e}")))?;
        let map = serde_json::from_str(&json)
            .map_err(|e| StorageError::new(format!("invalid store file: {e}")))?;
        Ok(map)
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::new(format!("failed to encode store: {e}")))?;
        fs::write(&self.path, &json)
            .map_err(|e| StorageError::new(format!("failed to write store file: {e}")))?;

        // Set restrictive permissions (Unix only); the store holds tokens
        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms)
                .map_err(|e| StorageError::new(format!("failed to set permissions: {e}")))?;
        }

        Ok(())
    }
}

#[async_trait]
impl KeyStore for FileKeyStore {
    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load()?.keys().cloned().collect())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let mut map = self.load()?;
        for key in keys {
            map.remove(key);
        }
        self.save(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyStore::new(dir.path().join("store.json"));

        store.set("sb-cli-session", "{\"user\":1}").await.unwrap();
        store.set("theme", "dark").await.unwrap();

        // A fresh handle sees the persisted values
        let reopened = FileKeyStore::new(dir.path().join("store.json"));
        assert_eq!(
            reopened.get("sb-cli-session").await.unwrap().as_deref(),
            Some("{\"user\":1}")
        );

        reopened
            .remove(&["sb-cli-session".to_string()])
            .await
            .unwrap();
        assert_eq!(reopened.keys().await.unwrap(), vec!["theme".to_string()]);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyStore::new(dir.path().join("absent.json"));
        assert!(store.keys().await.unwrap().is_empty());
        assert!(store.get("anything").await.unwrap().is_none());
    }
}
