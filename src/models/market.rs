use rust_decimal::Decimal;
use serde::Serialize;

/// Per-market rollup over the trailing 1h/6h/24h horizons.
///
/// Derived view: recomputed from the trade ledger per query, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MarketAggregate {
    pub name: String,
    pub condition_id: Option<String>,
    pub volume_1h: Decimal,
    pub volume_6h: Decimal,
    pub volume_24h: Decimal,
    pub yes_volume_24h: Decimal,
    pub no_volume_24h: Decimal,
    pub total_volume: Decimal,
    pub trade_count: i64,
    pub unique_wallets: i64,
    /// YES share of 24h volume in percent; 50 when there is no volume.
    pub yes_bias: Decimal,
    /// Last-hour run-rate over the trailing-24h average hourly volume.
    pub momentum: Decimal,
}
