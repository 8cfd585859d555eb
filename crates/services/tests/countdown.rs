use std::sync::Arc;
use std::time::Duration;

use services::{SessionManager, SessionRecord, SettingsService, Tick, View};
use storage::json::load_json;
use storage::keys;
use storage::repository::InMemoryStore;

async fn short_session(store: Arc<InMemoryStore>) -> SessionManager {
    let settings = SettingsService::new(store.clone());
    settings.set_timer_duration(30).await.unwrap();
    SessionManager::builder(settings, store).with_seed(3).build()
}

#[tokio::test(start_paused = true)]
async fn countdown_reaches_zero_and_shows_results() {
    let store = Arc::new(InMemoryStore::new());
    let manager = short_session(store.clone()).await;
    let mut views = manager.view_changes();

    manager.start_session().await.unwrap();
    assert!(manager.is_timer_running());

    tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            views.changed().await.unwrap();
            if *views.borrow() == View::Results {
                break;
            }
        }
    })
    .await
    .expect("countdown should finish");

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.time_remaining, 0);
    assert_eq!(snapshot.formatted_time, "0:00");
    assert!(!manager.is_timer_running());

    let stored: SessionRecord = load_json(store.as_ref(), keys::CURRENT_SESSION)
        .await
        .expect("persisted");
    assert_eq!(stored.time_remaining, 0);
    assert!(!manager.restore_session().await);
}

#[tokio::test(start_paused = true)]
async fn countdown_decrements_once_per_second() {
    let store = Arc::new(InMemoryStore::new());
    let manager = short_session(store.clone()).await;
    manager.start_session().await.unwrap();

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert_eq!(manager.snapshot().time_remaining, 25);

    let stored: SessionRecord = load_json(store.as_ref(), keys::CURRENT_SESSION)
        .await
        .expect("persisted");
    assert_eq!(stored.time_remaining, 25);
}

#[tokio::test(start_paused = true)]
async fn restarting_replaces_the_previous_countdown() {
    let manager = short_session(Arc::new(InMemoryStore::new())).await;
    manager.start_session().await.unwrap();
    manager.start_session().await.unwrap();

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    assert_eq!(manager.snapshot().time_remaining, 27);
}

#[tokio::test(start_paused = true)]
async fn manual_tick_expiry_stops_the_timer() {
    let manager = short_session(Arc::new(InMemoryStore::new())).await;
    manager.start_session().await.unwrap();

    for _ in 0..29 {
        assert!(matches!(manager.tick().await.unwrap(), Tick::Running(_)));
    }
    assert_eq!(manager.tick().await.unwrap(), Tick::Expired);
    assert_eq!(manager.view(), View::Results);
    assert!(!manager.is_timer_running());
    assert_eq!(manager.tick().await.unwrap(), Tick::Idle);
}

#[tokio::test(start_paused = true)]
async fn reset_stops_ticking() {
    let manager = short_session(Arc::new(InMemoryStore::new())).await;
    manager.start_session().await.unwrap();
    manager.reset_game().await.unwrap();

    tokio::time::sleep(Duration::from_secs(3)).await;
    let snapshot = manager.snapshot();
    assert_eq!(snapshot.view, View::Settings);
    assert_eq!(snapshot.time_remaining, 0);
}
