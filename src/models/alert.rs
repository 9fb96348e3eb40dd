use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Alert severity. Ordered so that `Low < Medium < High < Critical`,
/// which lets `max()` pick the highest severity directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database row for the alerts table. Append-only apart from the
/// dismissed flag, which only an operator action sets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub kind: String,
    pub wallet: Option<String>,
    pub cluster_id: Option<String>,
    pub market: Option<String>,
    pub details: Option<String>,
    pub severity: String,
    pub dedup_hash: String,
    pub dismissed: bool,
    pub created_at: DateTime<Utc>,
}

/// Alert row joined with the referenced wallet's current score.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AlertWithScore {
    pub id: Uuid,
    pub kind: String,
    pub wallet: Option<String>,
    pub cluster_id: Option<String>,
    pub market: Option<String>,
    pub details: Option<String>,
    pub severity: String,
    pub created_at: DateTime<Utc>,
    pub score: Option<Decimal>,
}

/// Candidate alert produced by an evaluation rule (or posted by an
/// external producer). Severity is assigned by the producing rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertCandidate {
    pub kind: String,
    pub wallet: Option<String>,
    pub cluster_id: Option<String>,
    pub market: Option<String>,
    pub details: Option<String>,
    pub severity: Severity,
}

/// Active-alert counts by severity, as served by `/api/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct AlertStats {
    pub total: i64,
    pub critical: i64,
    pub high: i64,
    pub medium: i64,
    pub low: i64,
    pub highest_severity: String,
}

impl AlertStats {
    /// Fold `(severity, count)` pairs into the stats summary.
    /// Unrecognized severities count toward the total only.
    pub fn from_counts(counts: &[(String, i64)]) -> Self {
        let mut stats = AlertStats {
            total: 0,
            critical: 0,
            high: 0,
            medium: 0,
            low: 0,
            highest_severity: "none".into(),
        };

        let mut highest: Option<Severity> = None;
        for (severity, count) in counts {
            stats.total += count;
            let Some(sev) = Severity::from_str(severity) else {
                continue;
            };
            match sev {
                Severity::Critical => stats.critical += count,
                Severity::High => stats.high += count,
                Severity::Medium => stats.medium += count,
                Severity::Low => stats.low += count,
            }
            if *count > 0 {
                highest = Some(highest.map_or(sev, |h| h.max(sev)));
            }
        }

        if let Some(h) = highest {
            stats.highest_severity = h.as_str().into();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_severity_round_trip() {
        for s in ["critical", "high", "medium", "low"] {
            assert_eq!(Severity::from_str(s).unwrap().as_str(), s);
        }
        assert_eq!(Severity::from_str("bogus"), None);
    }

    #[test]
    fn test_stats_highest_severity() {
        let counts = vec![("high".to_string(), 2), ("low".to_string(), 1)];
        let stats = AlertStats::from_counts(&counts);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.low, 1);
        assert_eq!(stats.highest_severity, "high");
    }

    #[test]
    fn test_stats_empty_is_none() {
        let stats = AlertStats::from_counts(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.highest_severity, "none");
    }

    #[test]
    fn test_stats_critical_wins() {
        let counts = vec![
            ("low".to_string(), 5),
            ("critical".to_string(), 1),
            ("medium".to_string(), 2),
        ];
        let stats = AlertStats::from_counts(&counts);
        assert_eq!(stats.highest_severity, "critical");
    }
}
