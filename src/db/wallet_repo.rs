use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{WalletProfile, WalletUpsert};

use super::UpsertOutcome;

/// Per-batch counts for wallet upserts: existing addresses are replaced,
/// not skipped.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct WalletBatchOutcome {
    pub inserted: i64,
    pub updated: i64,
}

/// Insert a wallet profile or fully replace the existing one at that
/// address. `inserted` reports which path was taken.
pub async fn upsert_wallet(pool: &PgPool, wallet: &WalletUpsert) -> anyhow::Result<UpsertOutcome> {
    let (id, inserted): (Uuid, bool) = sqlx::query_as(
        r#"
        INSERT INTO wallets (
            address, first_seen, last_seen, trade_count, total_volume,
            win_count, loss_count, win_rate, pnl, score, is_flagged,
            funding_sources, is_cex_funded, cluster_id, score_breakdown, flags
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        ON CONFLICT (address) DO UPDATE SET
            first_seen = EXCLUDED.first_seen,
            last_seen = EXCLUDED.last_seen,
            trade_count = EXCLUDED.trade_count,
            total_volume = EXCLUDED.total_volume,
            win_count = EXCLUDED.win_count,
            loss_count = EXCLUDED.loss_count,
            win_rate = EXCLUDED.win_rate,
            pnl = EXCLUDED.pnl,
            score = EXCLUDED.score,
            is_flagged = EXCLUDED.is_flagged,
            funding_sources = EXCLUDED.funding_sources,
            is_cex_funded = EXCLUDED.is_cex_funded,
            cluster_id = EXCLUDED.cluster_id,
            score_breakdown = EXCLUDED.score_breakdown,
            flags = EXCLUDED.flags,
            updated_at = NOW()
        RETURNING id, (xmax = 0) AS inserted
        "#,
    )
    .bind(&wallet.address)
    .bind(wallet.first_seen)
    .bind(wallet.last_seen)
    .bind(wallet.trade_count)
    .bind(wallet.total_volume)
    .bind(wallet.win_count)
    .bind(wallet.loss_count)
    .bind(wallet.win_rate)
    .bind(wallet.pnl)
    .bind(wallet.score)
    .bind(wallet.is_flagged)
    .bind(&wallet.funding_sources)
    .bind(wallet.is_cex_funded)
    .bind(&wallet.cluster_id)
    .bind(wallet.score_breakdown.map(Json))
    .bind(&wallet.flags)
    .fetch_one(pool)
    .await?;

    Ok(UpsertOutcome { inserted, id })
}

/// Sequential batch upsert; reports inserted vs updated counts.
pub async fn batch_upsert_wallets(
    pool: &PgPool,
    wallets: &[WalletUpsert],
) -> anyhow::Result<WalletBatchOutcome> {
    let mut outcome = WalletBatchOutcome::default();

    for wallet in wallets {
        if upsert_wallet(pool, wallet).await?.inserted {
            outcome.inserted += 1;
        } else {
            outcome.updated += 1;
        }
    }

    Ok(outcome)
}

pub async fn get_wallet_by_address(
    pool: &PgPool,
    address: &str,
) -> anyhow::Result<Option<WalletProfile>> {
    let wallet = sqlx::query_as::<_, WalletProfile>("SELECT * FROM wallets WHERE address = $1")
        .bind(address)
        .fetch_optional(pool)
        .await?;

    Ok(wallet)
}

/// Top wallets by suspicion score, descending. Ties break by insertion
/// order, so the LIMIT boundary is deterministic.
pub async fn get_top_by_score(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<WalletProfile>> {
    let wallets = sqlx::query_as::<_, WalletProfile>(
        "SELECT * FROM wallets ORDER BY score DESC, created_at, id LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(wallets)
}

/// Smart-money candidates: wallets scoring strictly above the threshold.
pub async fn get_smart_wallets(
    pool: &PgPool,
    threshold: Decimal,
    limit: i64,
) -> anyhow::Result<Vec<WalletProfile>> {
    let wallets = sqlx::query_as::<_, WalletProfile>(
        "SELECT * FROM wallets WHERE score > $1 ORDER BY score DESC, created_at, id LIMIT $2",
    )
    .bind(threshold)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(wallets)
}

pub async fn count_wallets(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wallets")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
