use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Cluster, ClusterUpsert};

use super::UpsertOutcome;

/// Insert a cluster or replace the existing one with that cluster id.
pub async fn upsert_cluster(
    pool: &PgPool,
    cluster: &ClusterUpsert,
) -> anyhow::Result<UpsertOutcome> {
    let (id, inserted): (Uuid, bool) = sqlx::query_as(
        r#"
        INSERT INTO clusters (cluster_id, funding_source, wallet_count, total_volume, coordinated_bets)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (cluster_id) DO UPDATE SET
            funding_source = EXCLUDED.funding_source,
            wallet_count = EXCLUDED.wallet_count,
            total_volume = EXCLUDED.total_volume,
            coordinated_bets = EXCLUDED.coordinated_bets,
            updated_at = NOW()
        RETURNING id, (xmax = 0) AS inserted
        "#,
    )
    .bind(&cluster.cluster_id)
    .bind(&cluster.funding_source)
    .bind(cluster.wallet_count)
    .bind(cluster.total_volume)
    .bind(cluster.coordinated_bets)
    .fetch_one(pool)
    .await?;

    Ok(UpsertOutcome { inserted, id })
}

pub async fn get_cluster_by_id(
    pool: &PgPool,
    cluster_id: &str,
) -> anyhow::Result<Option<Cluster>> {
    let cluster = sqlx::query_as::<_, Cluster>("SELECT * FROM clusters WHERE cluster_id = $1")
        .bind(cluster_id)
        .fetch_optional(pool)
        .await?;

    Ok(cluster)
}

pub async fn count_clusters(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clusters")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
