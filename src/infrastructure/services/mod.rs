//! Infrastructure services

mod pattern_learner_service;
mod response_cache_service;
mod stats_aggregator;

pub use pattern_learner_service::PatternLearnerService;
pub use response_cache_service::{ResponseCacheConfig, ResponseCacheService};
pub use stats_aggregator::{StatsAggregator, DEFAULT_TOP_N};
