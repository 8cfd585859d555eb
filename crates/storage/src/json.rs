//! Typed JSON records on top of a `KeyValueStore`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::repository::{KeyValueStore, StorageError};

/// Load and decode the record under `key`.
///
/// Missing, unreadable and corrupt records all come back as `None`; the
/// latter two are logged.
pub async fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let raw = match store.load(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, error = %err, "failed to load record");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "discarding corrupt record");
            None
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, or the store's
/// error if the write fails.
pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized + Sync,
{
    let raw =
        serde_json::to_string(value).map_err(|err| StorageError::Serialization(err.to_string()))?;
    store.save(key, &raw).await
}
