//! Learned question patterns

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cache::normalize_question;
use crate::domain::storage::StorageDocument;
use crate::domain::DomainError;

/// Category assigned to questions reported without one
pub const DEFAULT_CATEGORY: &str = "general";

const ID_PREFIX: &str = "pattern-";

/// Stable identifier of a learned pattern
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(String);

impl PatternId {
    pub fn generate() -> Self {
        Self(format!("{}{}", ID_PREFIX, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PatternId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid_part = s.strip_prefix(ID_PREFIX).ok_or_else(|| {
            DomainError::invalid_id(format!("Pattern ID '{}' must start with '{}'", s, ID_PREFIX))
        })?;

        Uuid::parse_str(uuid_part).map_err(|e| {
            DomainError::invalid_id(format!("Pattern ID '{}' is not valid: {}", s, e))
        })?;

        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves a reported category, falling back to `default` when blank
pub fn resolve_category(category: Option<&str>, default: &str) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => default.to_string(),
    }
}

/// A recurring question observed from users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedPattern {
    id: PatternId,
    /// Representative question text (the first phrasing observed)
    pub question: String,
    normalized: String,
    category: String,
    frequency: u64,
    first_asked: DateTime<Utc>,
    last_asked: DateTime<Utc>,
    added_to_training: bool,
    answer: Option<String>,
}

impl LearnedPattern {
    /// Creates a pattern for a first observation
    ///
    /// `question` must already be known to normalize to non-empty text.
    pub fn first_observation(question: &str, category: String, now: DateTime<Utc>) -> Self {
        Self {
            id: PatternId::generate(),
            question: question.trim().to_string(),
            normalized: normalize_question(question),
            category,
            frequency: 1,
            first_asked: now,
            last_asked: now,
            added_to_training: false,
            answer: None,
        }
    }

    pub fn id(&self) -> &PatternId {
        &self.id
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn first_asked(&self) -> DateTime<Utc> {
        self.first_asked
    }

    pub fn last_asked(&self) -> DateTime<Utc> {
        self.last_asked
    }

    pub fn added_to_training(&self) -> bool {
        self.added_to_training
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// Whether this pattern is the one a normalized question in a category maps to
    pub fn matches(&self, normalized: &str, category: &str) -> bool {
        self.category == category && self.normalized == normalized
    }

    /// Accounts a repeated observation. Identity and promotion state are untouched.
    pub fn observe_again(&mut self, now: DateTime<Utc>) {
        self.frequency = self.frequency.saturating_add(1);
        if now > self.last_asked {
            self.last_asked = now;
        }
    }

    /// Marks the pattern as part of the curated answer set. There is no way back.
    pub fn promote(&mut self, answer: impl Into<String>) {
        self.added_to_training = true;
        self.answer = Some(answer.into());
    }

    pub fn asked_since(&self, since: DateTime<Utc>) -> bool {
        self.last_asked >= since
    }

    pub fn first_asked_since(&self, since: DateTime<Utc>) -> bool {
        self.first_asked >= since
    }

    /// Ranking used by listings: most frequent first, then oldest, then id
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| self.first_asked.cmp(&other.first_asked))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Persisted state of the pattern learner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternDocument {
    #[serde(default)]
    pub patterns: Vec<LearnedPattern>,
}

impl StorageDocument for PatternDocument {
    fn document_name() -> &'static str {
        "learned_patterns"
    }
}

impl PatternDocument {
    pub fn find(&self, id: &PatternId) -> Option<&LearnedPattern> {
        self.patterns.iter().find(|p| p.id() == id)
    }

    pub fn find_mut(&mut self, id: &PatternId) -> Option<&mut LearnedPattern> {
        self.patterns.iter_mut().find(|p| p.id() == id)
    }

    pub fn find_matching_mut(
        &mut self,
        normalized: &str,
        category: &str,
    ) -> Option<&mut LearnedPattern> {
        self.patterns
            .iter_mut()
            .find(|p| p.matches(normalized, category))
    }

    /// Patterns in ranking order, optionally restricted to one category
    pub fn ranked(&self, category: Option<&str>) -> Vec<LearnedPattern> {
        let mut patterns: Vec<LearnedPattern> = self
            .patterns
            .iter()
            .filter(|p| category.is_none_or(|c| p.category() == c))
            .cloned()
            .collect();
        patterns.sort_by(|a, b| a.rank_cmp(b));
        patterns
    }
}
