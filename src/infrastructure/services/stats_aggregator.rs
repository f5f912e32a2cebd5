//! Read-only activity projections over the response cache and pattern learner

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::activity::{
    ActivitySnapshot, ExternalCounts, TimeWindow, TopPattern, TopQuestion, WindowActivity,
};
use crate::domain::{CacheEntry, LearnedPattern};

use super::pattern_learner_service::PatternLearnerService;
use super::response_cache_service::ResponseCacheService;

/// Default number of rows in "top" listings
pub const DEFAULT_TOP_N: usize = 10;

/// Combines statistics of both stores for the admin surface. Never mutates.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    cache: Arc<ResponseCacheService>,
    learner: Arc<PatternLearnerService>,
    top_n: usize,
}

impl StatsAggregator {
    pub fn new(cache: Arc<ResponseCacheService>, learner: Arc<PatternLearnerService>) -> Self {
        Self {
            cache,
            learner,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Full overview as of now
    pub async fn snapshot(&self, external: ExternalCounts) -> ActivitySnapshot {
        self.snapshot_at(external, Utc::now()).await
    }

    /// Full overview as of `now`
    pub async fn snapshot_at(
        &self,
        external: ExternalCounts,
        now: DateTime<Utc>,
    ) -> ActivitySnapshot {
        // Counts and listings of a store must come from the same read
        let (cache, entries) = self.cache.overview().await;
        let (learning, patterns) = self.learner.overview().await;

        let windows = TimeWindow::ALL
            .iter()
            .map(|window| window_activity(*window, now, &entries, &patterns))
            .collect();

        ActivitySnapshot {
            generated_at: now,
            cache,
            learning,
            external,
            top_questions: entries.iter().take(self.top_n).map(TopQuestion::from).collect(),
            top_patterns: patterns.iter().take(self.top_n).map(TopPattern::from).collect(),
            windows,
        }
    }

    /// Activity inside one trailing window ending now
    pub async fn activity(&self, window: TimeWindow) -> WindowActivity {
        self.activity_at(window, Utc::now()).await
    }

    /// Activity inside one trailing window ending at `now`
    pub async fn activity_at(&self, window: TimeWindow, now: DateTime<Utc>) -> WindowActivity {
        let entries = self.cache.entries().await;
        let patterns = self.learner.list(None).await;
        window_activity(window, now, &entries, &patterns)
    }
}

fn window_activity(
    window: TimeWindow,
    now: DateTime<Utc>,
    entries: &[CacheEntry],
    patterns: &[LearnedPattern],
) -> WindowActivity {
    let since = window.since(now);

    WindowActivity {
        window,
        since,
        cache_entries_used: entries.iter().filter(|e| e.used_since(since)).count(),
        patterns_asked: patterns.iter().filter(|p| p.asked_since(since)).count(),
        new_patterns: patterns.iter().filter(|p| p.first_asked_since(since)).count(),
    }
}
