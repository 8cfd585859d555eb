//! Shared error types for the services crate.

use thiserror::Error;

use safari_core::GenerateError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionManager`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping game services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
