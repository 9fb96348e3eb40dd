use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_auth;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Protected API routes — require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Read plane
        .route("/api/stats", get(handlers::stats::get_stats))
        .route("/api/alerts", get(handlers::alerts::list).post(handlers::alerts::create))
        .route("/api/alerts/:id/dismiss", post(handlers::alerts::dismiss))
        .route("/api/leaderboard", get(handlers::leaderboard::list))
        .route("/api/markets/hot", get(handlers::markets::hot))
        .route("/api/wallets/:address", get(handlers::wallets::detail))
        .route("/api/insights", get(handlers::insights::get))
        .route("/api/clusters/:id", get(handlers::clusters::detail))
        // Write plane (ingestion + external processes)
        .route("/api/trades", post(handlers::ingest::trade))
        .route("/api/trades/batch", post(handlers::ingest::trade_batch))
        .route("/api/wallets/batch", post(handlers::ingest::wallet_batch))
        .route("/api/clusters", post(handlers::clusters::upsert))
        .layer(middleware::from_fn(require_auth));

    // CORS: allow same-origin + dashboard origins; direct access needs token
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
