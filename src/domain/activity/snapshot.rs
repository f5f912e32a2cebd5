//! Combined activity read models for the admin surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::cache::{CacheEntry, CacheStatsSnapshot};
use crate::domain::learning::{LearnedPattern, LearningStatsSnapshot};

use super::window::TimeWindow;

/// Counts owned by collaborators outside this crate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalCounts {
    pub active_users: u64,
    pub documents: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopQuestion {
    pub question: String,
    pub hits: u64,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<&CacheEntry> for TopQuestion {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            question: entry.question.clone(),
            hits: entry.hits(),
            last_used_at: entry.last_used_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPattern {
    pub id: String,
    pub question: String,
    pub category: String,
    pub frequency: u64,
    pub added_to_training: bool,
}

impl From<&LearnedPattern> for TopPattern {
    fn from(pattern: &LearnedPattern) -> Self {
        Self {
            id: pattern.id().to_string(),
            question: pattern.question.clone(),
            category: pattern.category().to_string(),
            frequency: pattern.frequency(),
            added_to_training: pattern.added_to_training(),
        }
    }
}

/// Activity inside one trailing time window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowActivity {
    pub window: TimeWindow,
    pub since: DateTime<Utc>,
    /// Cache entries served at least once inside the window
    pub cache_entries_used: usize,
    /// Patterns asked at least once inside the window
    pub patterns_asked: usize,
    /// Patterns first seen inside the window
    pub new_patterns: usize,
}

/// Everything the admin dashboard shows on its overview page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySnapshot {
    pub generated_at: DateTime<Utc>,
    pub cache: CacheStatsSnapshot,
    pub learning: LearningStatsSnapshot,
    pub external: ExternalCounts,
    pub top_questions: Vec<TopQuestion>,
    pub top_patterns: Vec<TopPattern>,
    pub windows: Vec<WindowActivity>,
}
