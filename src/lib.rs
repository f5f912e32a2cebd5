//! Assistant response cache
//!
//! Reuse of answers to questions that were already asked, and learning of
//! recurring questions that are worth curating:
//! - Response cache keyed by normalized question text
//! - Pattern learner counting how often each question comes back
//! - Read-only statistics over both, per time window
//! - JSON file persistence with write-through and atomic replace

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::cache::CacheDocument;
use domain::learning::{PatternDocument, PromotionPolicy};
use infrastructure::services::{PatternLearnerService, ResponseCacheConfig, ResponseCacheService};
use infrastructure::storage::{StorageConfig, StorageFactory};
use tracing::info;

/// Create the application state from configuration
///
/// Nothing is read from disk here; each store hydrates on first use.
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = StorageConfig::from_backend(&config.storage.backend, &config.storage.data_dir)?;
    info!("Storage backend: {:?}", storage.storage_type());

    let cache_backend =
        StorageFactory::create::<CacheDocument>(&storage, &config.storage.cache_file);
    let cache_config =
        ResponseCacheConfig::default().with_per_call_cost(config.cache.per_call_cost);
    let cache = Arc::new(ResponseCacheService::with_config(cache_backend, cache_config));

    let patterns_backend =
        StorageFactory::create::<PatternDocument>(&storage, &config.storage.patterns_file);
    let policy = PromotionPolicy::new(config.learning.promotion_threshold);
    let learner = Arc::new(
        PatternLearnerService::with_policy(patterns_backend, policy)
            .with_default_category(config.learning.default_category.clone()),
    );

    Ok(AppState::new(cache, learner, config.stats.top_n))
}
