use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One weighted component of the suspicion score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub score: Decimal,
    pub max: Decimal,
}

impl ScoreComponent {
    pub fn new(score: Decimal, max: Decimal) -> Self {
        Self { score, max }
    }
}

/// Explainable breakdown of a wallet's suspicion score.
///
/// Each component score lies in [0, max]. The aggregate score is a
/// weighted function of the six components (maxes total 120, the
/// aggregate is normalized onto 0–100), computed by the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub account_age: ScoreComponent,
    pub bet_concentration: ScoreComponent,
    pub size_anomaly: ScoreComponent,
    pub win_rate: ScoreComponent,
    pub timing: ScoreComponent,
    pub funding: ScoreComponent,
}

/// Per-component maximum. All six share the same cap.
pub const COMPONENT_MAX: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

impl Default for ScoreBreakdown {
    fn default() -> Self {
        let zero = ScoreComponent::new(Decimal::ZERO, COMPONENT_MAX);
        Self {
            account_age: zero,
            bet_concentration: zero,
            size_anomaly: zero,
            win_rate: zero,
            timing: zero,
            funding: zero,
        }
    }
}

impl ScoreBreakdown {
    pub fn components(&self) -> [ScoreComponent; 6] {
        [
            self.account_age,
            self.bet_concentration,
            self.size_anomaly,
            self.win_rate,
            self.timing,
            self.funding,
        ]
    }

    /// Sum of the raw component scores (out of 120).
    pub fn total(&self) -> Decimal {
        self.components().iter().map(|c| c.score).sum()
    }
}

/// Database row for the wallets table. One profile per address; the
/// scoring engine is the sole writer of score, breakdown and flags.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WalletProfile {
    pub id: Uuid,
    pub address: String,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub trade_count: i32,
    pub total_volume: Decimal,
    pub win_count: i32,
    pub loss_count: i32,
    pub win_rate: Decimal,
    pub pnl: Decimal,
    pub score: Decimal,
    pub is_flagged: bool,
    pub funding_sources: Option<String>,
    pub is_cex_funded: bool,
    pub cluster_id: Option<String>,
    pub score_breakdown: Option<Json<ScoreBreakdown>>,
    pub flags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WalletProfile {
    /// Breakdown with the documented defaults for profiles that predate
    /// scoring.
    pub fn breakdown(&self) -> ScoreBreakdown {
        self.score_breakdown
            .as_ref()
            .map(|j| j.0)
            .unwrap_or_default()
    }
}

/// Upsert payload for a wallet profile (full replace on address).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletUpsert {
    pub address: String,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub trade_count: i32,
    pub total_volume: Decimal,
    pub win_count: i32,
    pub loss_count: i32,
    pub win_rate: Decimal,
    pub pnl: Decimal,
    pub score: Decimal,
    pub is_flagged: bool,
    pub funding_sources: Option<String>,
    pub is_cex_funded: bool,
    pub cluster_id: Option<String>,
    pub score_breakdown: Option<ScoreBreakdown>,
    #[serde(default)]
    pub flags: Vec<String>,
}
