use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::db::{alert_repo, cluster_repo, trade_repo, wallet_repo};
use crate::errors::AppError;
use crate::models::AlertStats;
use crate::AppState;

#[derive(Serialize)]
pub struct StatsResponse {
    pub trades: i64,
    pub wallets: i64,
    pub clusters: i64,
    pub alerts: AlertStats,
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let trades = trade_repo::count_trades(&state.db).await?;
    let wallets = wallet_repo::count_wallets(&state.db).await?;
    let clusters = cluster_repo::count_clusters(&state.db).await?;
    let severity_counts = alert_repo::count_active_by_severity(&state.db).await?;

    Ok(Json(StatsResponse {
        trades,
        wallets,
        clusters,
        alerts: AlertStats::from_counts(&severity_counts),
    }))
}
