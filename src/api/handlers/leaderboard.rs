use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::wallet_repo;
use crate::errors::AppError;
use crate::intelligence::ranking::{self, LeaderboardEntry, DEFAULT_LEADERBOARD_LIMIT};
use crate::AppState;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// Wallets ranked by suspicion score, descending.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT as i64)
        .clamp(1, 100);

    let wallets = wallet_repo::get_top_by_score(&state.db, limit).await?;
    Ok(Json(ranking::leaderboard(&wallets, limit as usize)))
}
