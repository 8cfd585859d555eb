use std::sync::Arc;

use storage::repository::{KeyValueStore, Storage};

use crate::Clock;
use crate::error::AppServicesError;
use crate::sessions::SessionManager;
use crate::settings_service::SettingsService;

/// Assembles the settings service and session manager over one store.
#[derive(Clone)]
pub struct GameServices {
    settings: SettingsService,
    sessions: SessionManager,
}

impl GameServices {
    /// Build services over an already opened `Storage`.
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::clone(&storage.kv);
        let settings = SettingsService::new(Arc::clone(&store));
        let sessions = SessionManager::builder(settings.clone(), store)
            .with_clock(clock)
            .build();
        Self { settings, sessions }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, clock))
    }

    /// Build services over a throwaway in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}
