use rust_decimal::Decimal;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    /// Safety ceiling on rows fetched per windowed scan. The primary
    /// windowing mechanism is the time-range query, not this cap.
    pub max_scan_rows: i64,

    /// Minimum notional for a trade to count as a whale move.
    pub whale_notional_threshold: Decimal,

    /// Wallets scoring strictly above this join the smart-money cohort.
    pub smart_score_threshold: Decimal,
    pub smart_cohort_size: i64,

    /// Markets below this total volume are skipped by the consensus
    /// divergence ranking.
    pub min_consensus_volume: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            max_scan_rows: env::var("MAX_SCAN_ROWS")
                .unwrap_or_else(|_| "5000".into())
                .parse()
                .unwrap_or(5000),
            whale_notional_threshold: env::var("WHALE_NOTIONAL_THRESHOLD")
                .unwrap_or_else(|_| "1000".into())
                .parse()
                .unwrap_or(Decimal::from(1000)),
            smart_score_threshold: env::var("SMART_SCORE_THRESHOLD")
                .unwrap_or_else(|_| "40".into())
                .parse()
                .unwrap_or(Decimal::from(40)),
            smart_cohort_size: env::var("SMART_COHORT_SIZE")
                .unwrap_or_else(|_| "50".into())
                .parse()
                .unwrap_or(50),
            min_consensus_volume: env::var("MIN_CONSENSUS_VOLUME")
                .unwrap_or_else(|_| "500".into())
                .parse()
                .unwrap_or(Decimal::from(500)),
        })
    }
}
