pub mod alerts;
pub mod clusters;
pub mod health;
pub mod ingest;
pub mod insights;
pub mod leaderboard;
pub mod markets;
pub mod metrics;
pub mod stats;
pub mod wallets;
