pub mod aggregator;
pub mod alerts;
pub mod insights;
pub mod ranking;
pub mod scorer;
pub mod smart_money;

pub use aggregator::{aggregate_markets, momentum, yes_bias};
pub use insights::{build_insights, get_insights, Insights};
pub use ranking::{hot_markets, leaderboard, HotMarket, LeaderboardEntry};
pub use scorer::{aggregate_score, build_profile, compute_breakdown, refresh_wallet};
pub use smart_money::{consensus_divergence, select_cohort, smart_flows};
