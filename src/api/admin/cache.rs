//! Response cache admin endpoints

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{CacheEntry, CacheStatsSnapshot};

#[derive(Debug, Clone, Deserialize)]
pub struct RecordRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryResponse {
    pub key: String,
    pub question: String,
    pub answer: String,
    pub hits: u64,
    pub created_at: String,
    pub last_used_at: Option<String>,
}

impl From<&CacheEntry> for CacheEntryResponse {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            key: entry.key().as_str().to_string(),
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            hits: entry.hits(),
            created_at: entry.created_at().to_rfc3339(),
            last_used_at: entry.last_used_at().map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListEntriesResponse {
    pub entries: Vec<CacheEntryResponse>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub removed: usize,
}

/// GET /admin/cache/stats
pub async fn stats(State(state): State<AppState>) -> Json<CacheStatsSnapshot> {
    Json(state.cache.stats().await)
}

/// GET /admin/cache/entries
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ListEntriesResponse> {
    let entries = match query.limit {
        Some(limit) => state.cache.top(limit).await,
        None => state.cache.entries().await,
    };

    let entries: Vec<CacheEntryResponse> = entries.iter().map(CacheEntryResponse::from).collect();
    let total = entries.len();

    Json(ListEntriesResponse { entries, total })
}

/// GET /admin/cache/lookup
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<CacheEntryResponse>, ApiError> {
    let entry = state
        .cache
        .lookup(&query.question)
        .await?
        .ok_or_else(|| ApiError::not_found("No cached response for this question"))?;

    Ok(Json(CacheEntryResponse::from(&entry)))
}

/// POST /admin/cache
pub async fn record(
    State(state): State<AppState>,
    Json(request): Json<RecordRequest>,
) -> Result<Json<CacheEntryResponse>, ApiError> {
    debug!("Admin recording cached response");

    let entry = state.cache.record(&request.question, &request.answer).await?;

    Ok(Json(CacheEntryResponse::from(&entry)))
}

/// POST /admin/cache/hit
pub async fn record_hit(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<CacheEntryResponse>, ApiError> {
    let entry = state.cache.record_hit(&request.question).await?;

    Ok(Json(CacheEntryResponse::from(&entry)))
}

/// DELETE /admin/cache
pub async fn reset(State(state): State<AppState>) -> Json<ResetResponse> {
    debug!("Admin resetting response cache");

    Json(ResetResponse {
        removed: state.cache.reset().await,
    })
}
