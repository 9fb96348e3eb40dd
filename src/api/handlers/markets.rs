use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::db::trade_repo;
use crate::errors::AppError;
use crate::intelligence::aggregator::aggregate_markets;
use crate::intelligence::ranking::{self, HotMarket, DEFAULT_HOT_MARKETS_LIMIT};
use crate::AppState;

#[derive(Deserialize)]
pub struct HotMarketsQuery {
    pub limit: Option<i64>,
}

/// Markets ranked by trailing-24h volume, descending. Recomputed from
/// the ledger per query; nothing is cached or persisted.
pub async fn hot(
    State(state): State<AppState>,
    Query(query): Query<HotMarketsQuery>,
) -> Result<Json<Vec<HotMarket>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HOT_MARKETS_LIMIT as i64)
        .clamp(1, 100);

    let now = Utc::now();
    let trades = trade_repo::get_trades_since(
        &state.db,
        now - Duration::hours(24),
        state.config.max_scan_rows,
    )
    .await?;

    let markets = aggregate_markets(&trades, now);
    Ok(Json(ranking::hot_markets(markets, limit as usize)))
}
