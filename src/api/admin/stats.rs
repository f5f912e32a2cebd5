//! Combined statistics endpoints

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{ActivitySnapshot, ExternalCounts, TimeWindow, WindowActivity};

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityQuery {
    pub window: Option<String>,
}

/// GET /admin/stats
///
/// Active users and document counts are owned elsewhere and passed through
/// as query parameters.
pub async fn overview(
    State(state): State<AppState>,
    Query(external): Query<ExternalCounts>,
) -> Json<ActivitySnapshot> {
    Json(state.stats.snapshot(external).await)
}

/// GET /admin/stats/activity
pub async fn activity(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<WindowActivity>, ApiError> {
    let window = match query.window.as_deref() {
        Some(raw) => raw
            .parse::<TimeWindow>()
            .map_err(|e| ApiError::from(e).with_param("window"))?,
        None => TimeWindow::Week,
    };

    Ok(Json(state.stats.activity(window).await))
}
