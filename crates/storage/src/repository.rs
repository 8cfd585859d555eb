use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String-keyed, string-valued persistence.
///
/// Values are opaque to the store; callers serialize records themselves
/// (see `crate::json`).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store; contents vanish with the process.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Connection("in-memory store lock poisoned".into()))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// The chosen backend behind a trait object for easy swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            kv: Arc::new(InMemoryStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_round_trip_overwrite_remove() {
        let store = InMemoryStore::new();
        assert_eq!(store.load("a").await.unwrap(), None);

        store.save("a", "1").await.unwrap();
        store.save("a", "2").await.unwrap();
        assert_eq!(store.load("a").await.unwrap().as_deref(), Some("2"));

        store.remove("a").await.unwrap();
        assert_eq!(store.load("a").await.unwrap(), None);
        store.remove("a").await.unwrap();
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.kv.save("k", "v").await.unwrap();
        assert_eq!(other.kv.load("k").await.unwrap().as_deref(), Some("v"));
    }
}
