pub mod alert_repo;
pub mod cluster_repo;
pub mod trade_repo;
pub mod wallet_repo;

use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Result of an idempotent upsert. `inserted: false` means the key
/// already existed — a no-op, not an error.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpsertOutcome {
    pub inserted: bool,
    pub id: Uuid,
}

/// Per-batch counts for batch upserts. Batches are processed
/// sequentially and are idempotent per record, not atomic as a whole.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchOutcome {
    pub inserted: i64,
    pub skipped: i64,
}

pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}
