//! Learned pattern admin endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{LearnedPattern, LearningStatsSnapshot, PatternId};

#[derive(Debug, Clone, Deserialize)]
pub struct ObserveRequest {
    pub question: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromoteRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListPatternsQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternResponse {
    pub id: String,
    pub question: String,
    pub normalized: String,
    pub category: String,
    pub frequency: u64,
    pub first_asked: String,
    pub last_asked: String,
    pub added_to_training: bool,
    pub answer: Option<String>,
}

impl From<&LearnedPattern> for PatternResponse {
    fn from(pattern: &LearnedPattern) -> Self {
        Self {
            id: pattern.id().to_string(),
            question: pattern.question.clone(),
            normalized: pattern.normalized().to_string(),
            category: pattern.category().to_string(),
            frequency: pattern.frequency(),
            first_asked: pattern.first_asked().to_rfc3339(),
            last_asked: pattern.last_asked().to_rfc3339(),
            added_to_training: pattern.added_to_training(),
            answer: pattern.answer().map(String::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListPatternsResponse {
    pub patterns: Vec<PatternResponse>,
    pub total: usize,
}

impl ListPatternsResponse {
    fn from_patterns(patterns: &[LearnedPattern]) -> Self {
        let patterns: Vec<PatternResponse> = patterns.iter().map(PatternResponse::from).collect();
        let total = patterns.len();
        Self { patterns, total }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub removed: usize,
}

/// GET /admin/patterns
pub async fn list_patterns(
    State(state): State<AppState>,
    Query(query): Query<ListPatternsQuery>,
) -> Json<ListPatternsResponse> {
    let mut patterns = state.learner.list(query.category.as_deref()).await;
    if let Some(limit) = query.limit {
        patterns.truncate(limit);
    }

    Json(ListPatternsResponse::from_patterns(&patterns))
}

/// POST /admin/patterns/observe
pub async fn observe(
    State(state): State<AppState>,
    Json(request): Json<ObserveRequest>,
) -> Result<Json<PatternResponse>, ApiError> {
    let pattern = state
        .learner
        .observe(&request.question, request.category.as_deref())
        .await?;

    Ok(Json(PatternResponse::from(&pattern)))
}

/// GET /admin/patterns/stats
pub async fn stats(State(state): State<AppState>) -> Json<LearningStatsSnapshot> {
    Json(state.learner.stats().await)
}

/// GET /admin/patterns/candidates
pub async fn list_candidates(State(state): State<AppState>) -> Json<ListPatternsResponse> {
    let candidates = state.learner.promotion_candidates().await;
    Json(ListPatternsResponse::from_patterns(&candidates))
}

/// GET /admin/patterns/{pattern_id}
pub async fn get_pattern(
    State(state): State<AppState>,
    Path(pattern_id): Path<String>,
) -> Result<Json<PatternResponse>, ApiError> {
    let id: PatternId = pattern_id.parse()?;

    let pattern = state
        .learner
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Pattern '{}' not found", id)))?;

    Ok(Json(PatternResponse::from(&pattern)))
}

/// POST /admin/patterns/{pattern_id}/promote
pub async fn promote(
    State(state): State<AppState>,
    Path(pattern_id): Path<String>,
    Json(request): Json<PromoteRequest>,
) -> Result<Json<PatternResponse>, ApiError> {
    let id: PatternId = pattern_id.parse()?;
    debug!(pattern_id = %id, "Admin promoting pattern");

    let pattern = state.learner.promote(&id, &request.answer).await?;

    Ok(Json(PatternResponse::from(&pattern)))
}

/// DELETE /admin/patterns/{pattern_id}
pub async fn delete_pattern(
    State(state): State<AppState>,
    Path(pattern_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: PatternId = pattern_id.parse()?;

    if state.learner.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Pattern '{}' not found", id)))
    }
}

/// DELETE /admin/patterns
pub async fn reset(State(state): State<AppState>) -> Json<ResetResponse> {
    debug!("Admin resetting learned patterns");

    Json(ResetResponse {
        removed: state.learner.reset().await,
    })
}
