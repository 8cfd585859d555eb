#![forbid(unsafe_code)]
//! Key-value persistence for settings and session snapshots.

pub mod json;
pub mod keys;
pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
