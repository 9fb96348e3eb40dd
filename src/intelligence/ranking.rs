use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{MarketAggregate, WalletProfile};

use super::aggregator::sort_by_total_volume;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const DEFAULT_HOT_MARKETS_LIMIT: usize = 10;

/// Leaderboard row: the public projection of a wallet profile.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub address: String,
    pub score: Decimal,
    pub total_volume: Decimal,
    pub trade_count: i32,
    pub win_rate: Decimal,
    pub is_flagged: bool,
}

/// Hot-market row served by `/api/markets/hot`.
#[derive(Debug, Clone, Serialize)]
pub struct HotMarket {
    pub name: String,
    pub condition_id: Option<String>,
    pub unique_wallets: i64,
    pub total_volume: Decimal,
    pub trade_count: i64,
}

/// Wallets descending by suspicion score, stable on ties, truncated.
/// Pure projection — no mutation.
pub fn leaderboard(wallets: &[WalletProfile], limit: usize) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<&WalletProfile> = wallets.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    ranked
        .into_iter()
        .take(limit)
        .map(|w| LeaderboardEntry {
            address: w.address.clone(),
            score: w.score,
            total_volume: w.total_volume,
            trade_count: w.trade_count,
            win_rate: w.win_rate,
            is_flagged: w.is_flagged,
        })
        .collect()
}

/// Markets descending by total volume, stable on ties, truncated.
pub fn hot_markets(markets: Vec<MarketAggregate>, limit: usize) -> Vec<HotMarket> {
    sort_by_total_volume(markets)
        .into_iter()
        .take(limit)
        .map(|m| HotMarket {
            name: m.name,
            condition_id: m.condition_id,
            unique_wallets: m.unique_wallets,
            total_volume: m.total_volume,
            trade_count: m.trade_count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
