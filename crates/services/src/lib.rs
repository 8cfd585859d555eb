#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod sessions;
pub mod settings_service;

pub use safari_core::Clock;

pub use app_services::GameServices;
pub use error::{AppServicesError, SessionError, SettingsError};
pub use sessions::{GameSnapshot, SessionManager, SessionManagerBuilder, SessionRecord, Tick, View};
pub use settings_service::SettingsService;
