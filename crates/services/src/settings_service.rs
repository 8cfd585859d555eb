use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use safari_core::model::{Difficulty, GlobalSettings, Operator};
use storage::json::{load_json, save_json};
use storage::keys;
use storage::repository::KeyValueStore;
use tracing::{debug, warn};

use crate::error::SettingsError;

#[derive(Debug, Default)]
struct SettingsState {
    settings: GlobalSettings,
    loaded: bool,
}

/// Owns the player's `GlobalSettings`.
///
/// Settings are read from storage once, on first use, and written back after
/// every change. A missing or unreadable record leaves the defaults in place.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
    state: Arc<Mutex<SettingsState>>,
}

impl SettingsService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(SettingsState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, SettingsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current settings without touching storage.
    #[must_use]
    pub fn current(&self) -> GlobalSettings {
        self.state().settings.clone()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state().loaded
    }

    /// Load persisted settings on first call; later calls return the cached
    /// value.
    pub async fn load(&self) -> GlobalSettings {
        {
            let state = self.state();
            if state.loaded {
                return state.settings.clone();
            }
        }

        let stored: Option<GlobalSettings> = load_json(self.store.as_ref(), keys::SETTINGS).await;

        let mut state = self.state();
        if !state.loaded {
            if let Some(settings) = stored {
                debug!(?settings, "loaded settings");
                state.settings = settings;
            }
            state.loaded = true;
        }
        state.settings.clone()
    }

    /// # Errors
    ///
    /// Returns `SettingsError` if the updated settings cannot be persisted.
    pub async fn set_difficulty(&self, difficulty: Difficulty) -> Result<GlobalSettings, SettingsError> {
        self.update(|settings| settings.set_difficulty(difficulty))
            .await
            .map(|(settings, ())| settings)
    }

    /// Replace the operator set. An empty set is ignored and `false` returned.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the updated settings cannot be persisted.
    pub async fn set_operators(&self, operators: &[Operator]) -> Result<bool, SettingsError> {
        self.update(|settings| settings.set_operators(operators))
            .await
            .map(|(_, changed)| changed)
    }

    /// Toggle one operator. Removing the last one is refused and `false`
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the updated settings cannot be persisted.
    pub async fn toggle_operator(&self, operator: Operator) -> Result<bool, SettingsError> {
        self.update(|settings| settings.toggle_operator(operator))
            .await
            .map(|(_, changed)| changed)
    }

    /// Set the timer; out-of-range values are clamped. Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the updated settings cannot be persisted.
    pub async fn set_timer_duration(&self, seconds: u32) -> Result<u32, SettingsError> {
        self.update(|settings| settings.set_timer_duration(seconds))
            .await
            .map(|(settings, ())| settings.timer_duration_secs())
    }

    /// # Errors
    ///
    /// Returns `SettingsError` if the defaults cannot be persisted.
    pub async fn reset_to_defaults(&self) -> Result<GlobalSettings, SettingsError> {
        self.update(|settings| *settings = GlobalSettings::default())
            .await
            .map(|(settings, ())| settings)
    }

    async fn update<R>(
        &self,
        mutate: impl FnOnce(&mut GlobalSettings) -> R,
    ) -> Result<(GlobalSettings, R), SettingsError> {
        self.load().await;

        let (snapshot, outcome) = {
            let mut state = self.state();
            let outcome = mutate(&mut state.settings);
            (state.settings.clone(), outcome)
        };

        if let Err(err) = save_json(self.store.as_ref(), keys::SETTINGS, &snapshot).await {
            warn!(error = %err, "failed to persist settings");
            return Err(err.into());
        }
        Ok((snapshot, outcome))
    }
}
