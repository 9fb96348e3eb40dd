use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{alert_repo, UpsertOutcome};
use crate::errors::AppError;
use crate::models::{AlertCandidate, AlertWithScore, Severity};
use crate::AppState;

const DEFAULT_ALERT_LIMIT: i64 = 50;

#[derive(Deserialize)]
pub struct AlertQuery {
    pub severity: Option<String>,
    pub limit: Option<i64>,
}

/// Active alerts, newest first, optionally filtered by severity.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Vec<AlertWithScore>>, AppError> {
    let severity = match query.severity.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(
            Severity::from_str(s)
                .ok_or_else(|| AppError::BadRequest(format!("unknown severity: {s}")))?
                .as_str(),
        ),
    };

    let limit = query.limit.unwrap_or(DEFAULT_ALERT_LIMIT).clamp(1, 500);
    let alerts = alert_repo::get_active_alerts(&state.db, severity, limit).await?;

    Ok(Json(alerts))
}

/// Idempotent create for external alert producers. A duplicate content
/// key returns the existing alert's id with `inserted: false`.
pub async fn create(
    State(state): State<AppState>,
    Json(candidate): Json<AlertCandidate>,
) -> Result<Json<UpsertOutcome>, AppError> {
    let outcome = alert_repo::upsert_alert(&state.db, &candidate).await?;
    Ok(Json(outcome))
}

/// Operator action: dismiss an alert. Terminal.
pub async fn dismiss(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let dismissed = alert_repo::dismiss_alert(&state.db, id).await?;
    if !dismissed {
        return Err(AppError::NotFound(format!("no active alert {id}")));
    }
    Ok(Json(serde_json::json!({ "dismissed": true })))
}
