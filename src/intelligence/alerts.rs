use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::models::{AlertCandidate, NewTrade, Severity, WalletUpsert};

pub const KIND_SUSPICIOUS_WALLET: &str = "suspicious_wallet";
pub const KIND_WHALE_MOVE: &str = "whale_move";

/// Score tiers for suspicious-wallet alerts.
const SCORE_CRITICAL: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const SCORE_HIGH: Decimal = Decimal::from_parts(70, 0, 0, false, 0);
const SCORE_MEDIUM: Decimal = Decimal::from_parts(55, 0, 0, false, 0);

/// Notional tiers for whale-move alerts (above the configured whale
/// threshold).
const WHALE_CRITICAL: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);
const WHALE_HIGH: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Content key for alert deduplication: a hash over
/// (kind, wallet, market, details). Two candidates with the same key
/// describe the same fact and must not both be reported.
pub fn dedup_key(
    kind: &str,
    wallet: Option<&str>,
    market: Option<&str>,
    details: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    for field in [wallet, market, details] {
        hasher.update([0x1f]);
        hasher.update(field.unwrap_or("").as_bytes());
    }
    hex::encode(hasher.finalize())
}

impl AlertCandidate {
    pub fn dedup_key(&self) -> String {
        dedup_key(
            &self.kind,
            self.wallet.as_deref(),
            self.market.as_deref(),
            self.details.as_deref(),
        )
    }
}

/// Suspicious-wallet rule: emit an alert once a refreshed profile's
/// score clears the medium tier. Details carry the score so the dedup
/// key distinguishes score changes.
pub fn evaluate_wallet(profile: &WalletUpsert) -> Option<AlertCandidate> {
    let severity = if profile.score >= SCORE_CRITICAL {
        Severity::Critical
    } else if profile.score >= SCORE_HIGH {
        Severity::High
    } else if profile.score >= SCORE_MEDIUM {
        Severity::Medium
    } else {
        return None;
    };

    Some(AlertCandidate {
        kind: KIND_SUSPICIOUS_WALLET.to_string(),
        wallet: Some(profile.address.clone()),
        cluster_id: profile.cluster_id.clone(),
        market: None,
        details: Some(format!("suspicion score {}", profile.score)),
        severity,
    })
}

/// Whale-move rule: emit an alert for any trade whose notional clears
/// the whale threshold, tiered by size.
pub fn evaluate_trade(trade: &NewTrade, whale_threshold: Decimal) -> Option<AlertCandidate> {
    let notional = trade.notional();
    if notional < whale_threshold {
        return None;
    }

    let severity = if notional >= WHALE_CRITICAL {
        Severity::Critical
    } else if notional >= WHALE_HIGH {
        Severity::High
    } else {
        Severity::Medium
    };

    let market = trade
        .condition_id
        .clone()
        .or_else(|| trade.title.clone());

    Some(AlertCandidate {
        kind: KIND_WHALE_MOVE.to_string(),
        wallet: Some(trade.wallet.clone()),
        cluster_id: None,
        market,
        details: Some(format!("{} {} at {}", trade.side, trade.size, trade.price)),
        severity,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
