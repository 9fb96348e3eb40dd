use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::models::{MarketAggregate, TradeRecord};

/// Compute one `MarketAggregate` per distinct market key from a trade
/// sample.
///
/// Pure function — no I/O. Trades older than 24h relative to `now` are
/// excluded entirely; younger trades bucket into every horizon whose age
/// threshold they satisfy. Output preserves first-observation order so
/// the sorted views below have a stable tie-break.
pub fn aggregate_markets(trades: &[TradeRecord], now: DateTime<Utc>) -> Vec<MarketAggregate> {
    struct Acc {
        name: String,
        condition_id: Option<String>,
        volume_1h: Decimal,
        volume_6h: Decimal,
        volume_24h: Decimal,
        yes_volume_24h: Decimal,
        no_volume_24h: Decimal,
        total_volume: Decimal,
        trade_count: i64,
        wallets: HashSet<String>,
    }

    let mut order: Vec<String> = Vec::new();
    let mut markets: HashMap<String, Acc> = HashMap::new();

    let h1 = now - Duration::hours(1);
    let h6 = now - Duration::hours(6);
    let h24 = now - Duration::hours(24);

    for trade in trades {
        if trade.timestamp < h24 {
            continue;
        }

        let key = trade.market_key().to_string();
        let acc = markets.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Acc {
                name: trade.market_name().to_string(),
                condition_id: trade.condition_id.clone(),
                volume_1h: Decimal::ZERO,
                volume_6h: Decimal::ZERO,
                volume_24h: Decimal::ZERO,
                yes_volume_24h: Decimal::ZERO,
                no_volume_24h: Decimal::ZERO,
                total_volume: Decimal::ZERO,
                trade_count: 0,
                wallets: HashSet::new(),
            }
        });

        let value = trade.notional();

        if trade.timestamp >= h1 {
            acc.volume_1h += value;
        }
        if trade.timestamp >= h6 {
            acc.volume_6h += value;
        }
        acc.volume_24h += value;
        if trade.is_yes() {
            acc.yes_volume_24h += value;
        } else {
            acc.no_volume_24h += value;
        }

        acc.total_volume += value;
        acc.trade_count += 1;
        acc.wallets.insert(trade.wallet.clone());
    }

    order
        .into_iter()
        .map(|key| {
            let acc = markets.remove(&key).expect("market accumulated");
            MarketAggregate {
                yes_bias: yes_bias(acc.yes_volume_24h, acc.volume_24h),
                momentum: momentum(acc.volume_1h, acc.volume_24h),
                name: acc.name,
                condition_id: acc.condition_id,
                volume_1h: acc.volume_1h,
                volume_6h: acc.volume_6h,
                volume_24h: acc.volume_24h,
                yes_volume_24h: acc.yes_volume_24h,
                no_volume_24h: acc.no_volume_24h,
                total_volume: acc.total_volume,
                trade_count: acc.trade_count,
                unique_wallets: acc.wallets.len() as i64,
            }
        })
        .collect()
}

/// YES share of 24h volume in percent. Neutral 50 when there is no
/// volume to split.
pub fn yes_bias(yes_volume_24h: Decimal, volume_24h: Decimal) -> Decimal {
    if volume_24h.is_zero() {
        return Decimal::from(50);
    }
    yes_volume_24h / volume_24h * Decimal::ONE_HUNDRED
}

/// Ratio of the last-hour run-rate to the trailing-24h average hourly
/// volume. Values above 1 indicate accelerating activity.
pub fn momentum(volume_1h: Decimal, volume_24h: Decimal) -> Decimal {
    if volume_24h.is_zero() {
        return Decimal::ZERO;
    }
    volume_1h / (volume_24h / Decimal::from(24))
}

/// Momentum view: descending by 1h volume, stable on ties.
pub fn sort_by_momentum(mut markets: Vec<MarketAggregate>) -> Vec<MarketAggregate> {
    markets.sort_by(|a, b| b.volume_1h.cmp(&a.volume_1h));
    markets
}

/// Hot-market view: descending by total volume, stable on ties.
pub fn sort_by_total_volume(mut markets: Vec<MarketAggregate>) -> Vec<MarketAggregate> {
    markets.sort_by(|a, b| b.total_volume.cmp(&a.total_volume));
    markets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
