use serde::{Deserialize, Serialize};
use storage::json::{load_json, save_json};
use storage::keys;
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteStore;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    time_remaining: u32,
    current_score: i32,
}

#[tokio::test]
async fn sqlite_round_trip_overwrite_remove() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert_eq!(store.load(keys::SETTINGS).await.unwrap(), None);

    store.save(keys::SETTINGS, "{\"a\":1}").await.unwrap();
    store.save(keys::SETTINGS, "{\"a\":2}").await.unwrap();
    assert_eq!(
        store.load(keys::SETTINGS).await.unwrap().as_deref(),
        Some("{\"a\":2}")
    );

    store.remove(keys::SETTINGS).await.unwrap();
    assert_eq!(store.load(keys::SETTINGS).await.unwrap(), None);
    store.remove(keys::SETTINGS).await.expect("removing a missing key is fine");
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("first migrate");
    store.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn storage_sqlite_handles_typed_records() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_typed?mode=memory&cache=shared")
        .await
        .expect("storage");

    let snapshot = Snapshot {
        time_remaining: 42,
        current_score: 17,
    };
    save_json(storage.kv.as_ref(), keys::CURRENT_SESSION, &snapshot)
        .await
        .unwrap();

    let raw = storage.kv.load(keys::CURRENT_SESSION).await.unwrap().unwrap();
    assert!(raw.contains("\"timeRemaining\":42"));

    let back: Option<Snapshot> = load_json(storage.kv.as_ref(), keys::CURRENT_SESSION).await;
    assert_eq!(back, Some(snapshot));

    storage.kv.save(keys::CURRENT_SESSION, "garbage").await.unwrap();
    let corrupt: Option<Snapshot> = load_json(storage.kv.as_ref(), keys::CURRENT_SESSION).await;
    assert_eq!(corrupt, None);
}
