//! Local key-value storage trait.

use async_trait::async_trait;

use crate::Result;

/// Local persistent key-value storage.
///
/// The platform's storage layer owns the actual persistence; this trait
/// exposes only what session cleanup needs: key enumeration and bulk
/// removal, plus single-value access for holders that persist their own
/// records.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Returns all keys currently stored.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Returns the value stored under a key, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value under a key, replacing any existing value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the given keys. Missing keys are ignored.
    async fn remove(&self, keys: &[String]) -> Result<()>;
}
