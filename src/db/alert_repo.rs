use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AlertCandidate, AlertWithScore};

use super::UpsertOutcome;

/// Create an alert unless an active alert with the same content key
/// already exists, in which case the existing id is returned and
/// nothing is written.
///
/// The partial unique index on dedup_hash (non-dismissed rows) gives the
/// check-then-write an O(1) lookup and makes it atomic under concurrent
/// producers.
pub async fn upsert_alert(
    pool: &PgPool,
    candidate: &AlertCandidate,
) -> anyhow::Result<UpsertOutcome> {
    let dedup_hash = candidate.dedup_key();

    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO alerts (kind, wallet, cluster_id, market, details, severity, dedup_hash)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (dedup_hash) WHERE NOT dismissed DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&candidate.kind)
    .bind(&candidate.wallet)
    .bind(&candidate.cluster_id)
    .bind(&candidate.market)
    .bind(&candidate.details)
    .bind(candidate.severity.as_str())
    .bind(&dedup_hash)
    .fetch_optional(pool)
    .await?;

    if let Some((id,)) = inserted {
        metrics::counter!("alerts_created_total").increment(1);
        return Ok(UpsertOutcome { inserted: true, id });
    }

    metrics::counter!("alerts_deduped_total").increment(1);
    let (id,): (Uuid,) =
        sqlx::query_as("SELECT id FROM alerts WHERE dedup_hash = $1 AND NOT dismissed")
            .bind(&dedup_hash)
            .fetch_one(pool)
            .await?;

    Ok(UpsertOutcome {
        inserted: false,
        id,
    })
}

/// Active alerts, newest first, optionally filtered by severity. Each
/// row join-fetches the referenced wallet's current score for display.
pub async fn get_active_alerts(
    pool: &PgPool,
    severity: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<AlertWithScore>> {
    let alerts = sqlx::query_as::<_, AlertWithScore>(
        r#"
        SELECT a.id, a.kind, a.wallet, a.cluster_id, a.market, a.details,
               a.severity, a.created_at, w.score
        FROM alerts a
        LEFT JOIN wallets w ON w.address = a.wallet
        WHERE NOT a.dismissed
          AND ($1::TEXT IS NULL OR a.severity = $1)
        ORDER BY a.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(severity)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(alerts)
}

/// Active-alert counts grouped by severity.
pub async fn count_active_by_severity(pool: &PgPool) -> anyhow::Result<Vec<(String, i64)>> {
    let counts: Vec<(String, i64)> = sqlx::query_as(
        "SELECT severity, COUNT(*) FROM alerts WHERE NOT dismissed GROUP BY severity",
    )
    .fetch_all(pool)
    .await?;

    Ok(counts)
}

/// Dismiss an alert. Terminal: dismissed alerts never reactivate, and
/// their content key becomes free for future alerts.
pub async fn dismiss_alert(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE alerts SET dismissed = true WHERE id = $1 AND NOT dismissed")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Alerts created since the start of the current UTC day.
pub async fn count_alerts_today(pool: &PgPool, now: DateTime<Utc>) -> anyhow::Result<i64> {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM alerts WHERE created_at >= $1")
        .bind(day_start)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
