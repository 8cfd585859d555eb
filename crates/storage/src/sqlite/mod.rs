use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{KeyValueStore, Storage};

mod kv_store;
mod migrate;

/// Key-value store over a single `kv_entries` table.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteStore {
    /// Open a pool for `database_url` (`sqlite://path` or a `file:` URI).
    ///
    /// Every connection runs in WAL mode with a five second busy timeout.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL is malformed or the database
    /// cannot be opened.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Open `SQLite` storage with an up-to-date schema.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let store = SqliteStore::connect(database_url).await?;
        store.migrate().await?;
        let kv: Arc<dyn KeyValueStore> = Arc::new(store);
        Ok(Self { kv })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_url_is_rejected() {
        let result = SqliteStore::connect("postgres://nope").await;
        assert!(matches!(result, Err(SqliteInitError::Sqlx(_))));
    }
}
