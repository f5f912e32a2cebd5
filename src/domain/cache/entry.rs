//! Cached question/answer exchanges

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::storage::StorageDocument;

use super::key::QuestionKey;

/// A prior question/answer exchange that can be served instead of calling the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    key: QuestionKey,
    /// Original question text, for display
    pub question: String,
    pub answer: String,
    hits: u64,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Creates a cold entry: no hits and never used
    pub fn new(
        key: QuestionKey,
        question: impl Into<String>,
        answer: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            question: question.into(),
            answer: answer.into(),
            hits: 0,
            created_at: now,
            last_used_at: None,
        }
    }

    pub fn key(&self) -> &QuestionKey {
        &self.key
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the entry was last served; `None` until the first hit
    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn is_used(&self) -> bool {
        self.hits > 0
    }

    /// Accounts one served hit
    pub fn record_hit(&mut self, now: DateTime<Utc>) {
        self.hits = self.hits.saturating_add(1);
        self.last_used_at = Some(now);
    }

    /// Whether the entry was served at or after `since`
    pub fn used_since(&self, since: DateTime<Utc>) -> bool {
        self.last_used_at.is_some_and(|at| at >= since)
    }
}

/// Persisted state of the response cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(default)]
    pub entries: BTreeMap<QuestionKey, CacheEntry>,
}

impl StorageDocument for CacheDocument {
    fn document_name() -> &'static str {
        "response_cache"
    }
}

impl CacheDocument {
    pub fn get(&self, key: &QuestionKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered for "top" displays: most hits first, oldest first on ties
    pub fn ranked(&self) -> Vec<CacheEntry> {
        let mut entries: Vec<CacheEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.hits
                .cmp(&a.hits)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.key.cmp(&b.key))
        });
        entries
    }
}
