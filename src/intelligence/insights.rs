use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::{alert_repo, trade_repo, wallet_repo};
use crate::models::{MarketAggregate, TradeRecord};

use super::aggregator::{aggregate_markets, sort_by_momentum};
use super::smart_money::{
    consensus_divergence, select_cohort, smart_flows, sort_by_smart_volume, ConsensusInsight,
    SmartFlow,
};

const MOMENTUM_LIMIT: usize = 10;
const SMART_MONEY_LIMIT: usize = 10;
const WHALE_MOVES_LIMIT: usize = 50;
const CONSENSUS_LIMIT: usize = 10;

/// One whale trade on the insights timeline.
#[derive(Debug, Clone, Serialize)]
pub struct WhaleMove {
    pub wallet: String,
    pub market: String,
    pub side: String,
    pub size: Decimal,
    pub price: Decimal,
    pub notional: Decimal,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyStats {
    pub trades_count: i64,
    pub volume: Decimal,
    pub unique_wallets: i64,
    pub alerts_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    pub market_momentum: Vec<MarketAggregate>,
    pub smart_money: Vec<SmartFlow>,
    pub whale_moves: Vec<WhaleMove>,
    pub market_consensus: Vec<ConsensusInsight>,
    pub daily_stats: DailyStats,
    pub last_updated: DateTime<Utc>,
}

/// Assemble the insights view from a 24h trade window and the
/// smart-money cohort.
///
/// Pure function: all inputs are point-in-time snapshots, `alerts_today`
/// having been counted by the caller.
pub fn build_insights(
    trades_24h: &[TradeRecord],
    cohort: &HashSet<String>,
    whale_threshold: Decimal,
    min_consensus_volume: Decimal,
    alerts_today: i64,
    now: DateTime<Utc>,
) -> Insights {
    let mut market_momentum = sort_by_momentum(aggregate_markets(trades_24h, now));
    market_momentum.truncate(MOMENTUM_LIMIT);

    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let today: Vec<&TradeRecord> = trades_24h
        .iter()
        .filter(|t| t.timestamp >= day_start && t.timestamp <= now)
        .collect();
    let today_owned: Vec<TradeRecord> = today.iter().map(|t| (*t).clone()).collect();

    let mut smart_money = sort_by_smart_volume(smart_flows(&today_owned, cohort));
    smart_money.truncate(SMART_MONEY_LIMIT);

    let mut market_consensus = consensus_divergence(&today_owned, cohort, min_consensus_volume);
    market_consensus.truncate(CONSENSUS_LIMIT);

    let mut whale_moves: Vec<WhaleMove> = trades_24h
        .iter()
        .filter(|t| t.notional() >= whale_threshold)
        .map(|t| WhaleMove {
            wallet: t.wallet.clone(),
            market: t.market_name().to_string(),
            side: t.side.clone(),
            size: t.size,
            price: t.price,
            notional: t.notional(),
            timestamp: t.timestamp,
        })
        .collect();
    whale_moves.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    whale_moves.truncate(WHALE_MOVES_LIMIT);

    let unique_wallets: HashSet<&str> = today.iter().map(|t| t.wallet.as_str()).collect();
    let daily_stats = DailyStats {
        trades_count: today.len() as i64,
        volume: today.iter().map(|t| t.notional()).sum(),
        unique_wallets: unique_wallets.len() as i64,
        alerts_count: alerts_today,
    };

    Insights {
        market_momentum,
        smart_money,
        whale_moves,
        market_consensus,
        daily_stats,
        last_updated: now,
    }
}

/// One day of a wallet's trading volume, for the profile sparkline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyVolume {
    pub date: chrono::NaiveDate,
    pub volume: Decimal,
}

/// Group a wallet's trades into per-day volume, ascending by date,
/// keeping the most recent `days`.
pub fn daily_volume_history(trades: &[TradeRecord], days: usize) -> Vec<DailyVolume> {
    let mut by_date: std::collections::BTreeMap<chrono::NaiveDate, Decimal> =
        std::collections::BTreeMap::new();

    for trade in trades {
        *by_date
            .entry(trade.timestamp.date_naive())
            .or_insert(Decimal::ZERO) += trade.notional();
    }

    let mut history: Vec<DailyVolume> = by_date
        .into_iter()
        .map(|(date, volume)| DailyVolume { date, volume })
        .collect();

    if history.len() > days {
        history.drain(..history.len() - days);
    }
    history
}

/// Fetch a fresh snapshot from the ledger and assemble the insights
/// view. The trade window is a true time-range query; the configured row
/// cap is a safety ceiling only.
pub async fn get_insights(pool: &PgPool, config: &AppConfig) -> anyhow::Result<Insights> {
    let now = Utc::now();

    let trades_24h =
        trade_repo::get_trades_since(pool, now - Duration::hours(24), config.max_scan_rows)
            .await?;

    let smart_wallets = wallet_repo::get_smart_wallets(
        pool,
        config.smart_score_threshold,
        config.smart_cohort_size,
    )
    .await?;
    let cohort = select_cohort(
        &smart_wallets,
        config.smart_score_threshold,
        config.smart_cohort_size as usize,
    );

    let alerts_today = alert_repo::count_alerts_today(pool, now).await?;

    Ok(build_insights(
        &trades_24h,
        &cohort,
        config.whale_notional_threshold,
        config.min_consensus_volume,
        alerts_today,
        now,
    ))
}
