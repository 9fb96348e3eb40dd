use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{NewTrade, TradeRecord};

use super::{BatchOutcome, UpsertOutcome};

/// Insert a trade unless its tx_hash already exists.
///
/// The unique index on tx_hash makes the duplicate check and the write
/// one atomic operation; re-ingestion of the same hash is a no-op.
pub async fn upsert_trade(pool: &PgPool, trade: &NewTrade) -> anyhow::Result<UpsertOutcome> {
    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO trades (tx_hash, wallet, side, asset, condition_id, title, slug, size, price, "timestamp", outcome)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (tx_hash) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&trade.tx_hash)
    .bind(&trade.wallet)
    .bind(&trade.side)
    .bind(&trade.asset)
    .bind(&trade.condition_id)
    .bind(&trade.title)
    .bind(&trade.slug)
    .bind(trade.size)
    .bind(trade.price)
    .bind(trade.timestamp)
    .bind(&trade.outcome)
    .fetch_optional(pool)
    .await?;

    if let Some((id,)) = inserted {
        return Ok(UpsertOutcome { inserted: true, id });
    }

    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM trades WHERE tx_hash = $1")
        .bind(&trade.tx_hash)
        .fetch_one(pool)
        .await?;

    Ok(UpsertOutcome {
        inserted: false,
        id,
    })
}

/// Sequential batch ingest. Each record is individually idempotent, so
/// retrying a partially-failed batch is safe.
pub async fn batch_upsert_trades(
    pool: &PgPool,
    trades: &[NewTrade],
) -> anyhow::Result<BatchOutcome> {
    let mut outcome = BatchOutcome::default();

    for trade in trades {
        if upsert_trade(pool, trade).await?.inserted {
            outcome.inserted += 1;
        } else {
            outcome.skipped += 1;
        }
    }

    Ok(outcome)
}

pub async fn get_trade_by_hash(
    pool: &PgPool,
    tx_hash: &str,
) -> anyhow::Result<Option<TradeRecord>> {
    let trade = sqlx::query_as::<_, TradeRecord>("SELECT * FROM trades WHERE tx_hash = $1")
        .bind(tx_hash)
        .fetch_optional(pool)
        .await?;

    Ok(trade)
}

/// Trades for a wallet, time-descending, bounded.
pub async fn get_trades_by_wallet(
    pool: &PgPool,
    wallet: &str,
    limit: i64,
) -> anyhow::Result<Vec<TradeRecord>> {
    let trades = sqlx::query_as::<_, TradeRecord>(
        r#"SELECT * FROM trades WHERE wallet = $1 ORDER BY "timestamp" DESC LIMIT $2"#,
    )
    .bind(wallet)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(trades)
}

/// Trades newer than `since`, time-descending. `cap` is a safety
/// ceiling on the row count, not the windowing mechanism.
pub async fn get_trades_since(
    pool: &PgPool,
    since: DateTime<Utc>,
    cap: i64,
) -> anyhow::Result<Vec<TradeRecord>> {
    let trades = sqlx::query_as::<_, TradeRecord>(
        r#"SELECT * FROM trades WHERE "timestamp" >= $1 ORDER BY "timestamp" DESC LIMIT $2"#,
    )
    .bind(since)
    .bind(cap)
    .fetch_all(pool)
    .await?;

    Ok(trades)
}

pub async fn count_trades(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trades")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
