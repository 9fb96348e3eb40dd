use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::db::{trade_repo, wallet_repo};
use crate::errors::AppError;
use crate::intelligence::insights::{daily_volume_history, DailyVolume};
use crate::models::{ScoreBreakdown, TradeRecord, WalletProfile};
use crate::AppState;

const WALLET_TRADE_LIMIT: i64 = 200;
const VOLUME_HISTORY_DAYS: usize = 30;

#[derive(Serialize)]
pub struct WalletDetail {
    pub wallet: WalletProfile,
    pub trades: Vec<TradeRecord>,
    pub score_breakdown: ScoreBreakdown,
    pub volume_history: Vec<DailyVolume>,
    pub flags: Vec<String>,
}

/// Full wallet view: profile, recent trades, score breakdown, per-day
/// volume history and flags.
pub async fn detail(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<WalletDetail>, AppError> {
    let wallet = wallet_repo::get_wallet_by_address(&state.db, &address)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("wallet {address} not found")))?;

    let trades = trade_repo::get_trades_by_wallet(&state.db, &address, WALLET_TRADE_LIMIT).await?;

    let score_breakdown = wallet.breakdown();
    let volume_history = daily_volume_history(&trades, VOLUME_HISTORY_DAYS);
    let flags = wallet.flags.clone();

    Ok(Json(WalletDetail {
        wallet,
        trades,
        score_breakdown,
        volume_history,
        flags,
    }))
}
