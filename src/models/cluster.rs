use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the clusters table: wallets sharing a funding source
/// with coordinated betting behavior. Produced by the external clustering
/// process; read-only for the analytics core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cluster {
    pub id: Uuid,
    pub cluster_id: String,
    pub funding_source: String,
    pub wallet_count: i32,
    pub total_volume: Decimal,
    pub coordinated_bets: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Upsert payload for a cluster (replace on cluster_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterUpsert {
    pub cluster_id: String,
    pub funding_source: String,
    pub wallet_count: i32,
    pub total_volume: Decimal,
    pub coordinated_bets: i32,
}
