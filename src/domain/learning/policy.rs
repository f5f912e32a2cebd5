//! Promotion policy for learned patterns
//!
//! The learner never promotes on its own. Callers use this policy to decide
//! which patterns deserve a curated answer and then call `promote`.

use super::pattern::LearnedPattern;

/// Minimum observations before a pattern is considered frequent
pub const DEFAULT_PROMOTION_THRESHOLD: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionPolicy {
    pub threshold: u64,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_PROMOTION_THRESHOLD,
        }
    }
}

impl PromotionPolicy {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn is_frequent(&self, pattern: &LearnedPattern) -> bool {
        pattern.frequency() >= self.threshold
    }

    /// Frequent and not yet part of the curated answer set
    pub fn is_candidate(&self, pattern: &LearnedPattern) -> bool {
        self.is_frequent(pattern) && !pattern.added_to_training()
    }
}
