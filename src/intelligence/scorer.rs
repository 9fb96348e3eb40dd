use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashSet;

use crate::db::{trade_repo, wallet_repo};
use crate::models::{
    ScoreBreakdown, ScoreComponent, TradeRecord, WalletProfile, WalletUpsert, COMPONENT_MAX,
};

/// How much trade history the scoring engine considers per wallet.
pub const SCORE_HISTORY_LIMIT: i64 = 500;

/// Reference notional for the size-anomaly component.
const SIZE_REFERENCE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Win rate below this threshold contributes nothing to the score.
const WIN_RATE_THRESHOLD: Decimal = Decimal::from_parts(6, 0, 0, false, 1); // 0.6

/// Compute the six-component breakdown for a wallet.
///
/// Every component is independently capped at [`COMPONENT_MAX`] and
/// rounded to a whole point, so each lies in [0, max].
pub fn compute_breakdown(
    first_seen: Option<DateTime<Utc>>,
    win_rate: Decimal,
    is_cex_funded: bool,
    funding_sources: Option<&str>,
    trades: &[TradeRecord],
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let cap = |v: Decimal| v.max(Decimal::ZERO).min(COMPONENT_MAX).round();
    let component = |v: Decimal| ScoreComponent::new(cap(v), COMPONENT_MAX);

    // Younger wallets are more suspicious; unknown age scores mid-range.
    let account_age = match first_seen {
        Some(fs) => {
            let days = Decimal::from((now - fs).num_seconds().max(0)) / Decimal::from(86_400);
            COMPONENT_MAX - days / Decimal::from(30)
        }
        None => Decimal::from(10),
    };

    // Many trades across few markets reads as concentrated betting.
    let unique_markets: HashSet<&str> = trades.iter().map(|t| t.market_key()).collect();
    let bet_concentration = if trades.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from(trades.len()) / Decimal::from(unique_markets.len().max(1))
            * Decimal::from(2)
    };

    // Average notional against the fixed reference size.
    let size_anomaly = if trades.is_empty() {
        Decimal::ZERO
    } else {
        let total: Decimal = trades.iter().map(|t| t.notional()).sum();
        total / Decimal::from(trades.len()) / SIZE_REFERENCE
    };

    // Only win rates above the threshold contribute, scaled linearly.
    let win_rate_score = if win_rate > WIN_RATE_THRESHOLD {
        (win_rate - Decimal::new(5, 1)) * Decimal::from(40)
    } else {
        Decimal::ZERO
    };

    // Burstiness proxy: frequent traders score higher.
    let timing = if trades.len() > 10 {
        Decimal::from(10)
    } else {
        Decimal::from(5)
    };

    // CEX funding is the least suspicious source; an identified non-CEX
    // source the most; unidentified sits in between.
    let funding = if is_cex_funded {
        Decimal::from(5)
    } else if funding_sources.is_some() {
        Decimal::from(15)
    } else {
        Decimal::from(10)
    };

    ScoreBreakdown {
        account_age: component(account_age),
        bet_concentration: component(bet_concentration),
        size_anomaly: component(size_anomaly),
        win_rate: component(win_rate_score),
        timing: component(timing),
        funding: component(funding),
    }
}

/// Aggregate suspicion score on a 0–100 scale.
///
/// The six component maxes total 120, so the aggregate normalizes the
/// weighted total rather than summing the components directly.
pub fn aggregate_score(breakdown: &ScoreBreakdown) -> Decimal {
    (breakdown.total() / Decimal::from(120) * Decimal::ONE_HUNDRED).round()
}

/// Derived wallet flags emitted alongside the score.
pub fn generate_flags(
    is_flagged: bool,
    win_rate: Decimal,
    is_cex_funded: bool,
    cluster_id: Option<&str>,
    total_volume: Decimal,
    trade_count: i32,
    first_seen: Option<DateTime<Utc>>,
    trades: &[TradeRecord],
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut flags = Vec::new();

    if is_flagged {
        flags.push("Flagged".to_string());
    }
    if win_rate > Decimal::new(7, 1) {
        flags.push("High Win Rate".to_string());
    }
    if is_cex_funded {
        flags.push("CEX Funded".to_string());
    }
    if cluster_id.is_some() {
        flags.push("Part of Cluster".to_string());
    }
    if total_volume > Decimal::from(100_000) {
        flags.push("High Volume".to_string());
    }
    if let Some(fs) = first_seen {
        let days_since_first = (now - fs).num_days();
        if days_since_first < 7 && trade_count > 50 {
            flags.push("Rapid Trader".to_string());
        }
    }
    if trades.iter().any(|t| t.notional() > Decimal::from(10_000)) {
        flags.push("Large Positions".to_string());
    }

    flags
}

/// Rebuild a wallet's profile from its trade history.
///
/// Pure function: recomputes stats, breakdown, aggregate score and flags.
/// Operator-set fields (flagged, funding, cluster) carry over from the
/// existing profile.
pub fn build_profile(
    address: &str,
    trades: &[TradeRecord],
    existing: Option<&WalletProfile>,
    now: DateTime<Utc>,
) -> WalletUpsert {
    let oldest = trades.iter().map(|t| t.timestamp).min();
    let newest = trades.iter().map(|t| t.timestamp).max();

    let first_seen = match (existing.and_then(|w| w.first_seen), oldest) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let last_seen = match (existing.and_then(|w| w.last_seen), newest) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    let total_volume: Decimal = trades.iter().map(|t| t.notional()).sum();

    // Win/loss and PnL from resolved trades only.
    let mut win_count = 0;
    let mut loss_count = 0;
    let mut pnl = Decimal::ZERO;
    for trade in trades {
        let Some(outcome) = trade.outcome.as_deref() else {
            continue;
        };
        if trade.side.eq_ignore_ascii_case(outcome) {
            win_count += 1;
            pnl += trade.size * (Decimal::ONE - trade.price);
        } else {
            loss_count += 1;
            pnl -= trade.size * trade.price;
        }
    }
    let resolved = win_count + loss_count;
    let win_rate = if resolved > 0 {
        Decimal::from(win_count) / Decimal::from(resolved)
    } else {
        Decimal::ZERO
    };

    let is_flagged = existing.is_some_and(|w| w.is_flagged);
    let is_cex_funded = existing.is_some_and(|w| w.is_cex_funded);
    let funding_sources = existing.and_then(|w| w.funding_sources.clone());
    let cluster_id = existing.and_then(|w| w.cluster_id.clone());

    let breakdown = compute_breakdown(
        first_seen,
        win_rate,
        is_cex_funded,
        funding_sources.as_deref(),
        trades,
        now,
    );
    let score = aggregate_score(&breakdown);
    let flags = generate_flags(
        is_flagged,
        win_rate,
        is_cex_funded,
        cluster_id.as_deref(),
        total_volume,
        trades.len() as i32,
        first_seen,
        trades,
        now,
    );

    WalletUpsert {
        address: address.to_string(),
        first_seen,
        last_seen,
        trade_count: trades.len() as i32,
        total_volume,
        win_count,
        loss_count,
        win_rate,
        pnl,
        score,
        is_flagged,
        funding_sources,
        is_cex_funded,
        cluster_id,
        score_breakdown: Some(breakdown),
        flags,
    }
}

/// Recompute and persist a wallet's profile after new trades landed.
///
/// Sole writer of score, breakdown and flags — keeps the aggregate and
/// the breakdown consistent by construction.
pub async fn refresh_wallet(pool: &PgPool, address: &str) -> anyhow::Result<WalletUpsert> {
    let trades = trade_repo::get_trades_by_wallet(pool, address, SCORE_HISTORY_LIMIT).await?;
    let existing = wallet_repo::get_wallet_by_address(pool, address).await?;

    let profile = build_profile(address, &trades, existing.as_ref(), Utc::now());
    wallet_repo::upsert_wallet(pool, &profile).await?;

    metrics::counter!("wallet_refreshes_total").increment(1);
    tracing::debug!(
        wallet = %address,
        score = %profile.score,
        trades = profile.trade_count,
        "Wallet profile refreshed"
    );

    Ok(profile)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
