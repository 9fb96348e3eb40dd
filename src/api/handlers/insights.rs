use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::intelligence::{self, Insights};
use crate::AppState;

/// Full insights view: market momentum, smart-money flow, whale moves,
/// consensus divergence and daily stats, recomputed from the current
/// ledger snapshot.
pub async fn get(State(state): State<AppState>) -> Result<Json<Insights>, AppError> {
    let insights = intelligence::get_insights(&state.db, &state.config).await?;
    Ok(Json(insights))
}
