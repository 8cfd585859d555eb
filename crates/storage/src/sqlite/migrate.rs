use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Ordered schema steps; a version is applied once and never edited.
const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    r"
        CREATE TABLE IF NOT EXISTS kv_entries (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    ",
)];

/// Brings the schema up to date. Each step runs in its own transaction and
/// is recorded in `schema_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    let current: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    let current = current.unwrap_or(0);

    for &(version, sql) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
        let mut tx = pool.begin().await?;
        sqlx::query(sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
            .bind(version)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::debug!(version, "applied schema migration");
    }

    Ok(())
}
