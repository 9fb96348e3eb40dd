use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the trades table. Append-only: rows are never
/// mutated or deleted, and tx_hash carries a unique index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TradeRecord {
    pub id: Uuid,
    pub tx_hash: String,
    pub wallet: String,
    pub side: String,
    pub asset: String,
    pub condition_id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub size: Decimal,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub outcome: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TradeRecord {
    /// Notional value of the trade in collateral units.
    pub fn notional(&self) -> Decimal {
        self.size * self.price
    }

    /// Grouping key for per-market aggregation: condition id when known,
    /// falling back to the market title, then "Unknown".
    pub fn market_key(&self) -> &str {
        self.condition_id
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("Unknown")
    }

    /// Display name for the market.
    pub fn market_name(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| self.market_key())
    }

    /// A trade counts toward YES volume when either the side or the
    /// resolved outcome says YES.
    pub fn is_yes(&self) -> bool {
        self.side.eq_ignore_ascii_case("YES")
            || self
                .outcome
                .as_deref()
                .is_some_and(|o| o.eq_ignore_ascii_case("YES"))
    }
}

/// Ingestion payload for a single trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrade {
    pub tx_hash: String,
    pub wallet: String,
    pub side: String,
    pub asset: String,
    pub condition_id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub size: Decimal,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub outcome: Option<String>,
}

impl NewTrade {
    pub fn notional(&self) -> Decimal {
        self.size * self.price
    }
}
