use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::intelligence::aggregator::yes_bias;
use crate::models::{TradeRecord, WalletProfile};

/// Minimum cohort trades in a market before it enters the divergence
/// ranking. Filters out single outlier trades.
pub const MIN_SMART_TRADES: i64 = 3;

/// Per-market smart-money flow over a trailing window.
#[derive(Debug, Clone, Serialize)]
pub struct SmartFlow {
    pub name: String,
    pub condition_id: Option<String>,
    pub smart_volume: Decimal,
    pub total_volume: Decimal,
    pub smart_yes_volume: Decimal,
    pub smart_no_volume: Decimal,
    /// Cohort share of total volume, in percent.
    pub smart_ratio: Decimal,
    /// YES share of cohort volume, in percent.
    pub smart_yes_bias: Decimal,
}

/// Smart-money vs general-market price divergence for one market.
#[derive(Debug, Clone, Serialize)]
pub struct ConsensusInsight {
    pub name: String,
    pub condition_id: Option<String>,
    /// Mean trade price of the general market, in percent.
    pub market_probability: Decimal,
    /// Mean trade price of the cohort, in percent.
    pub smart_probability: Decimal,
    /// Absolute difference between the two, in percentage points.
    pub divergence: Decimal,
    pub volume: Decimal,
    pub smart_trades: i64,
}

/// Pick the smart-money cohort: wallets whose score exceeds the
/// threshold, descending by score, capped at `max_size`.
pub fn select_cohort(
    wallets: &[WalletProfile],
    threshold: Decimal,
    max_size: usize,
) -> HashSet<String> {
    let mut eligible: Vec<&WalletProfile> =
        wallets.iter().filter(|w| w.score > threshold).collect();
    eligible.sort_by(|a, b| b.score.cmp(&a.score));
    eligible
        .into_iter()
        .take(max_size)
        .map(|w| w.address.clone())
        .collect()
}

/// Per-market cohort volume share over the given trade window.
///
/// Pure function; output keeps first-observation order and only markets
/// the cohort actually traded appear.
pub fn smart_flows(trades: &[TradeRecord], cohort: &HashSet<String>) -> Vec<SmartFlow> {
    struct Acc {
        name: String,
        condition_id: Option<String>,
        smart_volume: Decimal,
        total_volume: Decimal,
        smart_yes: Decimal,
        smart_no: Decimal,
    }

    let mut order: Vec<String> = Vec::new();
    let mut markets: HashMap<String, Acc> = HashMap::new();

    for trade in trades {
        let key = trade.market_key().to_string();
        let acc = markets.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Acc {
                name: trade.market_name().to_string(),
                condition_id: trade.condition_id.clone(),
                smart_volume: Decimal::ZERO,
                total_volume: Decimal::ZERO,
                smart_yes: Decimal::ZERO,
                smart_no: Decimal::ZERO,
            }
        });

        let value = trade.notional();
        acc.total_volume += value;

        if cohort.contains(&trade.wallet) {
            acc.smart_volume += value;
            if trade.is_yes() {
                acc.smart_yes += value;
            } else {
                acc.smart_no += value;
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| {
            let acc = markets.remove(&key).expect("market accumulated");
            if acc.smart_volume.is_zero() {
                return None;
            }
            let smart_ratio = if acc.total_volume.is_zero() {
                Decimal::ZERO
            } else {
                acc.smart_volume / acc.total_volume * Decimal::ONE_HUNDRED
            };
            Some(SmartFlow {
                name: acc.name,
                condition_id: acc.condition_id,
                smart_ratio,
                smart_yes_bias: yes_bias(acc.smart_yes, acc.smart_volume),
                smart_volume: acc.smart_volume,
                total_volume: acc.total_volume,
                smart_yes_volume: acc.smart_yes,
                smart_no_volume: acc.smart_no,
            })
        })
        .collect()
}

/// Descending by cohort volume, stable on ties.
pub fn sort_by_smart_volume(mut flows: Vec<SmartFlow>) -> Vec<SmartFlow> {
    flows.sort_by(|a, b| b.smart_volume.cmp(&a.smart_volume));
    flows
}

/// Price divergence between the cohort and the general market.
///
/// A market qualifies only when the cohort placed at least
/// [`MIN_SMART_TRADES`] trades in it, the rest of the market traded at
/// all, and total volume clears `min_volume`. Descending by divergence.
pub fn consensus_divergence(
    trades: &[TradeRecord],
    cohort: &HashSet<String>,
    min_volume: Decimal,
) -> Vec<ConsensusInsight> {
    struct Acc {
        name: String,
        condition_id: Option<String>,
        market_price_sum: Decimal,
        market_trades: i64,
        smart_price_sum: Decimal,
        smart_trades: i64,
        volume: Decimal,
    }

    let mut order: Vec<String> = Vec::new();
    let mut markets: HashMap<String, Acc> = HashMap::new();

    for trade in trades {
        let key = trade.market_key().to_string();
        let acc = markets.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Acc {
                name: trade.market_name().to_string(),
                condition_id: trade.condition_id.clone(),
                market_price_sum: Decimal::ZERO,
                market_trades: 0,
                smart_price_sum: Decimal::ZERO,
                smart_trades: 0,
                volume: Decimal::ZERO,
            }
        });

        acc.volume += trade.notional();
        if cohort.contains(&trade.wallet) {
            acc.smart_price_sum += trade.price;
            acc.smart_trades += 1;
        } else {
            acc.market_price_sum += trade.price;
            acc.market_trades += 1;
        }
    }

    let mut insights: Vec<ConsensusInsight> = order
        .into_iter()
        .filter_map(|key| {
            let acc = markets.remove(&key).expect("market accumulated");
            if acc.smart_trades < MIN_SMART_TRADES
                || acc.market_trades == 0
                || acc.volume < min_volume
            {
                return None;
            }

            let market_probability =
                acc.market_price_sum / Decimal::from(acc.market_trades) * Decimal::ONE_HUNDRED;
            let smart_probability =
                acc.smart_price_sum / Decimal::from(acc.smart_trades) * Decimal::ONE_HUNDRED;

            Some(ConsensusInsight {
                name: acc.name,
                condition_id: acc.condition_id,
                divergence: (market_probability - smart_probability).abs(),
                market_probability,
                smart_probability,
                volume: acc.volume,
                smart_trades: acc.smart_trades,
            })
        })
        .collect();

    insights.sort_by(|a, b| b.divergence.cmp(&a.divergence));
    insights
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_trade(market: &str, wallet: &str, size: i64, price: Decimal) -> TradeRecord {
        TradeRecord {
            id: Uuid::new_v4(),
            tx_hash: format!("0x{}", Uuid::new_v4().simple()),
            wallet: wallet.to_string(),
            side: "YES".to_string(),
            asset: "asset_1".to_string(),
            condition_id: Some(market.to_string()),
            title: Some(format!("Market {market}")),
            slug: None,
            size: Decimal::from(size),
            price,
            timestamp: Utc::now(),
            outcome: None,
            created_at: None,
        }
    }

    fn make_wallet(address: &str, score: i64) -> WalletProfile {
        WalletProfile {
            id: Uuid::new_v4(),
            address: address.to_string(),
            first_seen: None,
            last_seen: None,
            trade_count: 0,
            total_volume: Decimal::ZERO,
            win_count: 0,
            loss_count: 0,
            win_rate: Decimal::ZERO,
            pnl: Decimal::ZERO,
            score: Decimal::from(score),
            is_flagged: false,
            funding_sources: None,
            is_cex_funded: false,
            cluster_id: None,
            score_breakdown: None,
            flags: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_cohort_threshold_and_cap() {
        let wallets = vec![
            make_wallet("0xA", 90),
            make_wallet("0xB", 41),
            make_wallet("0xC", 40), // not strictly above threshold
            make_wallet("0xD", 10),
            make_wallet("0xE", 60),
        ];

        let cohort = select_cohort(&wallets, Decimal::from(40), 10);
        assert_eq!(cohort.len(), 3);
        assert!(cohort.contains("0xA"));
        assert!(cohort.contains("0xB"));
        assert!(cohort.contains("0xE"));

        // Cap keeps only the highest scores
        let capped = select_cohort(&wallets, Decimal::from(40), 2);
        assert_eq!(capped.len(), 2);
        assert!(capped.contains("0xA"));
        assert!(capped.contains("0xE"));
    }

    #[test]
    fn test_smart_flow_ratio_and_bias() {
        let cohort: HashSet<String> = ["0xSMART".to_string()].into();
        let trades = vec![
            make_trade("m1", "0xSMART", 300, Decimal::ONE),
            make_trade("m1", "0xOTHER", 700, Decimal::ONE),
        ];

        let flows = smart_flows(&trades, &cohort);
        assert_eq!(flows.len(), 1);
        let flow = &flows[0];
        assert_eq!(flow.smart_volume, Decimal::from(300));
        assert_eq!(flow.total_volume, Decimal::from(1000));
        assert_eq!(flow.smart_ratio, Decimal::from(30));
        // All cohort trades were YES
        assert_eq!(flow.smart_yes_bias, Decimal::from(100));
    }

    #[test]
    fn test_smart_flow_skips_markets_without_cohort_activity() {
        let cohort: HashSet<String> = ["0xSMART".to_string()].into();
        let trades = vec![make_trade("m1", "0xOTHER", 700, Decimal::ONE)];

        assert!(smart_flows(&trades, &cohort).is_empty());
    }

    #[test]
    fn test_consensus_divergence_formula() {
        let cohort: HashSet<String> = ["0xS1".to_string(), "0xS2".to_string()].into();
        // Market trades at 0.40/0.42 (avg 0.41), cohort at 0.60/0.58/0.61
        // (avg ~0.597) → divergence ~18.7 points.
        let trades = vec![
            make_trade("m1", "0xM1", 1000, Decimal::new(40, 2)),
            make_trade("m1", "0xM2", 1000, Decimal::new(42, 2)),
            make_trade("m1", "0xS1", 1000, Decimal::new(60, 2)),
            make_trade("m1", "0xS1", 1000, Decimal::new(58, 2)),
            make_trade("m1", "0xS2", 1000, Decimal::new(61, 2)),
        ];

        let insights = consensus_divergence(&trades, &cohort, Decimal::ZERO);
        assert_eq!(insights.len(), 1);
        let c = &insights[0];
        assert_eq!(c.market_probability, Decimal::from(41));
        assert_eq!(c.divergence.round_dp(1), Decimal::new(187, 1));
        assert_eq!(c.smart_trades, 3);
    }

    #[test]
    fn test_consensus_requires_three_cohort_trades() {
        let cohort: HashSet<String> = ["0xS1".to_string()].into();
        let trades = vec![
            make_trade("m1", "0xM1", 1000, Decimal::new(40, 2)),
            make_trade("m1", "0xM2", 1000, Decimal::new(42, 2)),
            // Only two cohort trades — excluded from the ranking
            make_trade("m1", "0xS1", 1000, Decimal::new(60, 2)),
            make_trade("m1", "0xS1", 1000, Decimal::new(58, 2)),
        ];

        assert!(consensus_divergence(&trades, &cohort, Decimal::ZERO).is_empty());
    }

    #[test]
    fn test_consensus_volume_gate() {
        let cohort: HashSet<String> = ["0xS1".to_string()].into();
        let trades = vec![
            make_trade("m1", "0xM1", 1, Decimal::new(40, 2)),
            make_trade("m1", "0xS1", 1, Decimal::new(60, 2)),
            make_trade("m1", "0xS1", 1, Decimal::new(58, 2)),
            make_trade("m1", "0xS1", 1, Decimal::new(61, 2)),
        ];

        // Total volume well below the floor
        assert!(consensus_divergence(&trades, &cohort, Decimal::from(500)).is_empty());
        assert_eq!(
            consensus_divergence(&trades, &cohort, Decimal::ZERO).len(),
            1
        );
    }

    #[test]
    fn test_consensus_ranking_descends_by_divergence() {
        let cohort: HashSet<String> = ["0xS1".to_string()].into();
        let mut trades = Vec::new();
        // m1: small divergence (0.50 vs 0.55)
        trades.push(make_trade("m1", "0xM1", 100, Decimal::new(50, 2)));
        for _ in 0..3 {
            trades.push(make_trade("m1", "0xS1", 100, Decimal::new(55, 2)));
        }
        // m2: large divergence (0.20 vs 0.80)
        trades.push(make_trade("m2", "0xM1", 100, Decimal::new(20, 2)));
        for _ in 0..3 {
            trades.push(make_trade("m2", "0xS1", 100, Decimal::new(80, 2)));
        }

        let insights = consensus_divergence(&trades, &cohort, Decimal::ZERO);
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].condition_id.as_deref(), Some("m2"));
        assert_eq!(insights[0].divergence, Decimal::from(60));
    }
}
