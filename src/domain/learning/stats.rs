//! Pattern learner statistics

use std::collections::BTreeMap;

use serde::Serialize;

use super::pattern::PatternDocument;
use super::policy::PromotionPolicy;

/// Point-in-time statistics of the pattern learner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningStatsSnapshot {
    pub total_patterns: usize,
    /// Distinct patterns per category
    pub by_category: BTreeMap<String, usize>,
    /// Patterns at or above the promotion threshold
    pub total_frequent: usize,
    pub total_in_training: usize,
    pub threshold: u64,
}

impl LearningStatsSnapshot {
    pub fn compute(document: &PatternDocument, policy: &PromotionPolicy) -> Self {
        let mut by_category = BTreeMap::new();
        let mut total_frequent = 0;
        let mut total_in_training = 0;

        for pattern in &document.patterns {
            *by_category.entry(pattern.category().to_string()).or_insert(0) += 1;

            if policy.is_frequent(pattern) {
                total_frequent += 1;
            }
            if pattern.added_to_training() {
                total_in_training += 1;
            }
        }

        Self {
            total_patterns: document.patterns.len(),
            by_category,
            total_frequent,
            total_in_training,
            threshold: policy.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::learning::LearnedPattern;
    use chrono::Utc;

    #[test]
    fn test_empty_stats() {
        let policy = PromotionPolicy::default();
        let stats = LearningStatsSnapshot::compute(&PatternDocument::default(), &policy);
        assert_eq!(stats.total_patterns, 0);
        assert!(stats.by_category.is_empty());
        assert_eq!(stats.total_frequent, 0);
        assert_eq!(stats.total_in_training, 0);
        assert_eq!(stats.threshold, 3);
    }

    #[test]
    fn test_stats_by_category() {
        let now = Utc::now();
        let mut frequent = LearnedPattern::first_observation("a", "ubicacion".into(), now);
        frequent.observe_again(now);
        frequent.observe_again(now);
        let mut promoted = LearnedPattern::first_observation("b", "ubicacion".into(), now);
        promoted.promote("respuesta");
        let other = LearnedPattern::first_observation("c", "general".into(), now);

        let doc = PatternDocument {
            patterns: vec![frequent, promoted, other],
        };
        let stats = LearningStatsSnapshot::compute(&doc, &PromotionPolicy::default());

        assert_eq!(stats.total_patterns, 3);
        assert_eq!(stats.by_category.get("ubicacion"), Some(&2));
        assert_eq!(stats.by_category.get("general"), Some(&1));
        assert_eq!(stats.total_frequent, 1);
        assert_eq!(stats.total_in_training, 1);
    }
}
