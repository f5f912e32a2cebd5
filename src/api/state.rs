//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{
    PatternLearnerService, ResponseCacheService, StatsAggregator,
};

/// Handles to the two stores and the aggregator reading both
#[derive(Debug, Clone)]
pub struct AppState {
    pub cache: Arc<ResponseCacheService>,
    pub learner: Arc<PatternLearnerService>,
    pub stats: Arc<StatsAggregator>,
}

impl AppState {
    pub fn new(
        cache: Arc<ResponseCacheService>,
        learner: Arc<PatternLearnerService>,
        top_n: usize,
    ) -> Self {
        let stats = StatsAggregator::new(cache.clone(), learner.clone()).with_top_n(top_n);

        Self {
            cache,
            learner,
            stats: Arc::new(stats),
        }
    }
}
