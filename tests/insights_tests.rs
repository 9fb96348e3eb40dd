use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use polysentry::intelligence::insights::{build_insights, daily_volume_history};
use polysentry::models::TradeRecord;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 29, 18, 0, 0).unwrap()
}

fn make_trade(
    market: &str,
    wallet: &str,
    side: &str,
    size: i64,
    price: Decimal,
    minutes_ago: i64,
) -> TradeRecord {
    TradeRecord {
        id: Uuid::new_v4(),
        tx_hash: format!("0x{}", Uuid::new_v4().simple()),
        wallet: wallet.to_string(),
        side: side.to_string(),
        asset: "asset_1".to_string(),
        condition_id: Some(market.to_string()),
        title: Some(format!("Market {market}")),
        slug: None,
        size: Decimal::from(size),
        price,
        timestamp: fixed_now() - Duration::minutes(minutes_ago),
        outcome: None,
        created_at: None,
    }
}

#[test]
fn test_whale_moves_filter_and_order() {
    let now = fixed_now();
    let trades = vec![
        // notional 1200 → whale move
        make_trade("m1", "0xA", "YES", 2000, Decimal::new(6, 1), 60),
        // notional 900 → below threshold
        make_trade("m1", "0xB", "NO", 1500, Decimal::new(6, 1), 30),
        // notional 5000 → whale move, more recent
        make_trade("m2", "0xC", "YES", 10_000, Decimal::new(5, 1), 10),
    ];

    let insights = build_insights(
        &trades,
        &HashSet::new(),
        Decimal::from(1000),
        Decimal::ZERO,
        0,
        now,
    );

    assert_eq!(insights.whale_moves.len(), 2);
    // Newest first
    assert_eq!(insights.whale_moves[0].wallet, "0xC");
    assert_eq!(insights.whale_moves[0].notional, Decimal::from(5000));
    assert_eq!(insights.whale_moves[1].wallet, "0xA");
    assert_eq!(insights.whale_moves[1].notional, Decimal::from(1200));
}

#[test]
fn test_market_momentum_ranks_recent_activity() {
    let now = fixed_now();
    let trades = vec![
        // m1: all volume 10h old
        make_trade("m1", "0xA", "YES", 5000, Decimal::ONE, 600),
        // m2: smaller but recent volume → higher 1h volume
        make_trade("m2", "0xB", "YES", 300, Decimal::ONE, 20),
    ];

    let insights = build_insights(
        &trades,
        &HashSet::new(),
        Decimal::from(1000),
        Decimal::ZERO,
        0,
        now,
    );

    assert_eq!(insights.market_momentum.len(), 2);
    assert_eq!(
        insights.market_momentum[0].condition_id.as_deref(),
        Some("m2")
    );
    // 300 / (300/24) = 24
    assert_eq!(insights.market_momentum[0].momentum, Decimal::from(24));
}

#[test]
fn test_daily_stats_count_today_only() {
    let now = fixed_now();
    let trades = vec![
        // Today (18:00 minus a few hours)
        make_trade("m1", "0xA", "YES", 100, Decimal::ONE, 60),
        make_trade("m1", "0xA", "NO", 200, Decimal::ONE, 120),
        make_trade("m2", "0xB", "YES", 300, Decimal::ONE, 180),
        // 20h ago → within 24h window but yesterday
        make_trade("m2", "0xC", "YES", 400, Decimal::ONE, 20 * 60),
    ];

    let insights = build_insights(
        &trades,
        &HashSet::new(),
        Decimal::from(1000),
        Decimal::ZERO,
        7,
        now,
    );

    assert_eq!(insights.daily_stats.trades_count, 3);
    assert_eq!(insights.daily_stats.volume, Decimal::from(600));
    assert_eq!(insights.daily_stats.unique_wallets, 2);
    assert_eq!(insights.daily_stats.alerts_count, 7);
    assert_eq!(insights.last_updated, now);
}

#[test]
fn test_smart_money_and_consensus_use_cohort() {
    let now = fixed_now();
    let cohort: HashSet<String> = ["0xSMART".to_string()].into();

    let mut trades = vec![
        make_trade("m1", "0xRETAIL", "YES", 1000, Decimal::new(40, 2), 60),
        make_trade("m1", "0xRETAIL", "NO", 1000, Decimal::new(42, 2), 50),
    ];
    for minutes in [10, 20, 30] {
        trades.push(make_trade(
            "m1",
            "0xSMART",
            "YES",
            1000,
            Decimal::new(60, 2),
            minutes,
        ));
    }
    // Market without cohort activity stays out of both views
    trades.push(make_trade("m2", "0xRETAIL", "YES", 500, Decimal::ONE, 15));

    let insights = build_insights(
        &trades,
        &cohort,
        Decimal::from(10_000),
        Decimal::ZERO,
        0,
        now,
    );

    assert_eq!(insights.smart_money.len(), 1);
    let flow = &insights.smart_money[0];
    assert_eq!(flow.condition_id.as_deref(), Some("m1"));
    assert_eq!(flow.smart_volume, Decimal::from(1800)); // 3 × 1000 × 0.6

    assert_eq!(insights.market_consensus.len(), 1);
    let consensus = &insights.market_consensus[0];
    assert_eq!(consensus.market_probability, Decimal::from(41));
    assert_eq!(consensus.smart_probability, Decimal::from(60));
    assert_eq!(consensus.divergence, Decimal::from(19));
}

#[test]
fn test_view_limits_hold() {
    let now = fixed_now();
    // 15 markets, one whale trade each
    let trades: Vec<TradeRecord> = (0..60)
        .map(|i| {
            make_trade(
                &format!("m{}", i % 15),
                &format!("0xW{i}"),
                "YES",
                3000,
                Decimal::new(5, 1),
                (i as i64) + 1,
            )
        })
        .collect();

    let insights = build_insights(
        &trades,
        &HashSet::new(),
        Decimal::from(1000),
        Decimal::ZERO,
        0,
        now,
    );

    assert_eq!(insights.market_momentum.len(), 10);
    assert_eq!(insights.whale_moves.len(), 50);
}

#[test]
fn test_daily_volume_history_groups_and_truncates() {
    let trades: Vec<TradeRecord> = (0..40)
        .map(|day| make_trade("m1", "0xA", "YES", 100, Decimal::ONE, day * 24 * 60))
        .collect();

    let history = daily_volume_history(&trades, 30);
    assert_eq!(history.len(), 30);
    // Ascending by date
    assert!(history.windows(2).all(|w| w[0].date < w[1].date));
    // Most recent days kept
    assert_eq!(history.last().unwrap().date, fixed_now().date_naive());
    assert_eq!(history.last().unwrap().volume, Decimal::from(100));
}

#[test]
fn test_daily_volume_history_sums_same_day() {
    let trades = vec![
        make_trade("m1", "0xA", "YES", 100, Decimal::ONE, 10),
        make_trade("m1", "0xA", "YES", 250, Decimal::ONE, 200),
    ];

    let history = daily_volume_history(&trades, 30);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].volume, Decimal::from(350));
}
