use std::collections::BTreeSet;

use axum::extract::State;
use axum::Json;

use crate::db::wallet_repo::WalletBatchOutcome;
use crate::db::{alert_repo, trade_repo, wallet_repo, BatchOutcome, UpsertOutcome};
use crate::errors::AppError;
use crate::intelligence::{alerts, scorer};
use crate::models::{NewTrade, WalletUpsert};
use crate::AppState;

/// Ingest a single trade. Re-ingesting an existing tx_hash is a no-op
/// reported via `inserted: false`.
///
/// A fresh insert triggers the downstream pipeline: wallet profile
/// refresh and alert-rule evaluation.
pub async fn trade(
    State(state): State<AppState>,
    Json(new_trade): Json<NewTrade>,
) -> Result<Json<UpsertOutcome>, AppError> {
    let outcome = trade_repo::upsert_trade(&state.db, &new_trade).await?;

    if outcome.inserted {
        metrics::counter!("trades_ingested_total").increment(1);
        process_inserted_trade(&state, &new_trade).await?;
    } else {
        metrics::counter!("trades_duplicate_total").increment(1);
        tracing::debug!(tx_hash = %new_trade.tx_hash, "Duplicate trade skipped");
    }

    Ok(Json(outcome))
}

/// Ingest a batch of trades sequentially. Per-record idempotency makes
/// retrying the whole batch safe after a partial failure.
pub async fn trade_batch(
    State(state): State<AppState>,
    Json(new_trades): Json<Vec<NewTrade>>,
) -> Result<Json<BatchOutcome>, AppError> {
    let mut outcome = BatchOutcome::default();
    let mut touched: BTreeSet<String> = BTreeSet::new();

    for new_trade in &new_trades {
        if trade_repo::upsert_trade(&state.db, new_trade).await?.inserted {
            outcome.inserted += 1;
            metrics::counter!("trades_ingested_total").increment(1);
            touched.insert(new_trade.wallet.clone());

            if let Some(candidate) =
                alerts::evaluate_trade(new_trade, state.config.whale_notional_threshold)
            {
                alert_repo::upsert_alert(&state.db, &candidate).await?;
            }
        } else {
            outcome.skipped += 1;
            metrics::counter!("trades_duplicate_total").increment(1);
        }
    }

    // One refresh per wallet, however many of its trades landed.
    for wallet in &touched {
        let profile = scorer::refresh_wallet(&state.db, wallet).await?;
        if let Some(candidate) = alerts::evaluate_wallet(&profile) {
            alert_repo::upsert_alert(&state.db, &candidate).await?;
        }
    }

    tracing::info!(
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        wallets = touched.len(),
        "Trade batch ingested"
    );

    Ok(Json(outcome))
}

/// Batch wallet upsert for external backfills (full replace per address).
pub async fn wallet_batch(
    State(state): State<AppState>,
    Json(wallets): Json<Vec<WalletUpsert>>,
) -> Result<Json<WalletBatchOutcome>, AppError> {
    let outcome = wallet_repo::batch_upsert_wallets(&state.db, &wallets).await?;
    Ok(Json(outcome))
}

async fn process_inserted_trade(state: &AppState, new_trade: &NewTrade) -> Result<(), AppError> {
    if let Some(candidate) =
        alerts::evaluate_trade(new_trade, state.config.whale_notional_threshold)
    {
        alert_repo::upsert_alert(&state.db, &candidate).await?;
    }

    let profile = scorer::refresh_wallet(&state.db, &new_trade.wallet).await?;
    if let Some(candidate) = alerts::evaluate_wallet(&profile) {
        alert_repo::upsert_alert(&state.db, &candidate).await?;
    }

    Ok(())
}
