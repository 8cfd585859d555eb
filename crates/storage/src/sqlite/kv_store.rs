use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{KeyValueStore, StorageError};

use super::SqliteStore;

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(value))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
