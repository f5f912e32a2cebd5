//! Question normalization and cache keys

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Normalizes free-form question text for exact-match identity
///
/// Trims, lowercases (Unicode aware) and collapses every run of internal
/// whitespace to a single space. Punctuation and accents are kept as-is.
pub fn normalize_question(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized question text used as the identity of a cached exchange
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionKey(String);

impl QuestionKey {
    /// Builds the key for a raw question, rejecting blank text
    pub fn from_question(raw: &str) -> Result<Self, DomainError> {
        let normalized = normalize_question(raw);

        if normalized.is_empty() {
            return Err(DomainError::invalid_input("Question must not be empty"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
