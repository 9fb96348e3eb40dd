use axum::extract::{Path, State};
use axum::Json;

use crate::db::{cluster_repo, UpsertOutcome};
use crate::errors::AppError;
use crate::models::{Cluster, ClusterUpsert};
use crate::AppState;

/// Upsert from the external clustering process (replace on cluster_id).
pub async fn upsert(
    State(state): State<AppState>,
    Json(cluster): Json<ClusterUpsert>,
) -> Result<Json<UpsertOutcome>, AppError> {
    let outcome = cluster_repo::upsert_cluster(&state.db, &cluster).await?;
    Ok(Json(outcome))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(cluster_id): Path<String>,
) -> Result<Json<Cluster>, AppError> {
    let cluster = cluster_repo::get_cluster_by_id(&state.db, &cluster_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cluster {cluster_id} not found")))?;

    Ok(Json(cluster))
}
