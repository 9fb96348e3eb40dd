pub mod alert;
pub mod cluster;
pub mod market;
pub mod trade;
pub mod wallet;

pub use alert::{Alert, AlertCandidate, AlertStats, AlertWithScore, Severity};
pub use cluster::{Cluster, ClusterUpsert};
pub use market::MarketAggregate;
pub use trade::{NewTrade, TradeRecord};
pub use wallet::{ScoreBreakdown, ScoreComponent, WalletProfile, WalletUpsert, COMPONENT_MAX};
