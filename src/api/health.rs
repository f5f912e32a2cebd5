//! Health check endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

/// Store check, reporting how much each store holds
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub items: usize,
    pub latency_ms: u64,
}

/// Returns 200 while the process is serving
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Hydrates both stores and reports their size
///
/// Unreadable documents already fall back to empty stores, so this never
/// reports unhealthy; a slow first call means a large document.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let cache_start = Instant::now();
    let cache_entries = state.cache.stats().await.total_entries;
    let cache_check = HealthCheck {
        name: "response_cache".to_string(),
        status: HealthStatus::Healthy,
        items: cache_entries,
        latency_ms: cache_start.elapsed().as_millis() as u64,
    };

    let learner_start = Instant::now();
    let patterns = state.learner.stats().await.total_patterns;
    let learner_check = HealthCheck {
        name: "learned_patterns".to_string(),
        status: HealthStatus::Healthy,
        items: patterns,
        latency_ms: learner_start.elapsed().as_millis() as u64,
    };

    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![cache_check, learner_check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    (StatusCode::OK, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
