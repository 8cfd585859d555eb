use std::sync::Arc;

use safari_core::model::{Difficulty, GlobalSettings, Operator};
use services::{Clock, GameServices, SettingsService};
use storage::keys;
use storage::repository::{InMemoryStore, KeyValueStore};

#[tokio::test]
async fn settings_survive_a_reload() {
    let store = Arc::new(InMemoryStore::new());
    let first = SettingsService::new(store.clone());
    first.set_difficulty(Difficulty::Hard).await.unwrap();
    first
        .set_operators(&[Operator::Multiply, Operator::Divide])
        .await
        .unwrap();
    first.set_timer_duration(45).await.unwrap();

    let raw = store.load(keys::SETTINGS).await.unwrap().expect("saved");
    assert!(raw.contains("\"defaultTimerDuration\":45"));

    let second = SettingsService::new(store);
    let loaded = second.load().await;
    assert_eq!(loaded.difficulty(), Difficulty::Hard);
    assert_eq!(loaded.operators(), &[Operator::Multiply, Operator::Divide]);
    assert_eq!(loaded.timer_duration_secs(), 45);
}

#[tokio::test]
async fn reset_to_defaults_persists() {
    let store = Arc::new(InMemoryStore::new());
    let service = SettingsService::new(store.clone());
    service.set_difficulty(Difficulty::Easy).await.unwrap();
    service.reset_to_defaults().await.unwrap();

    let reloaded = SettingsService::new(store).load().await;
    assert_eq!(reloaded, GlobalSettings::default());
}

#[tokio::test]
async fn sqlite_backed_services_keep_settings_and_sessions() {
    let url = "sqlite:file:memdb_services_stack?mode=memory&cache=shared";
    let services = GameServices::new_sqlite(url, Clock::default())
        .await
        .expect("sqlite services");
    services
        .settings()
        .set_operators(&[Operator::Subtract])
        .await
        .unwrap();
    services.sessions().start_session().await.unwrap();
    services.sessions().skip_problem().await.unwrap();

    let reopened = GameServices::new_sqlite(url, Clock::default())
        .await
        .expect("reopen");
    assert_eq!(reopened.settings().load().await.operators(), &[Operator::Subtract]);
    assert!(reopened.sessions().restore_session().await);
    let snapshot = reopened.sessions().snapshot();
    assert_eq!(snapshot.session.unwrap().results().len(), 1);

    services.sessions().reset_game().await.unwrap();
    reopened.sessions().reset_game().await.unwrap();
}
