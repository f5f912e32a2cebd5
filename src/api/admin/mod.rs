//! Admin API endpoints over the response cache and pattern learner

pub mod cache;
pub mod patterns;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // Response cache
        .route("/cache", post(cache::record).delete(cache::reset))
        .route("/cache/stats", get(cache::stats))
        .route("/cache/entries", get(cache::list_entries))
        .route("/cache/lookup", get(cache::lookup))
        .route("/cache/hit", post(cache::record_hit))
        // Learned patterns
        .route("/patterns", get(patterns::list_patterns).delete(patterns::reset))
        .route("/patterns/observe", post(patterns::observe))
        .route("/patterns/stats", get(patterns::stats))
        .route("/patterns/candidates", get(patterns::list_candidates))
        .route(
            "/patterns/{pattern_id}",
            get(patterns::get_pattern).delete(patterns::delete_pattern),
        )
        .route("/patterns/{pattern_id}/promote", post(patterns::promote))
        // Combined views
        .route("/stats", get(stats::overview))
        .route("/stats/activity", get(stats::activity))
}
