//! Pattern learner service - frequency tracking of recurring questions

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::cache::normalize_question;
use crate::domain::learning::{
    resolve_category, LearnedPattern, LearningStatsSnapshot, PatternDocument, PatternId,
    PromotionPolicy, DEFAULT_CATEGORY,
};
use crate::domain::storage::DocumentStore;
use crate::domain::DomainError;
use crate::infrastructure::storage::{Mutation, PersistedStore};

/// Service tracking how often each question is asked, per category
///
/// Promotion is always an explicit call. The configured [`PromotionPolicy`]
/// only feeds statistics and the candidate listing.
#[derive(Debug)]
pub struct PatternLearnerService {
    store: PersistedStore<PatternDocument>,
    policy: PromotionPolicy,
    default_category: String,
}

impl PatternLearnerService {
    pub fn new(backend: Arc<dyn DocumentStore<PatternDocument>>) -> Self {
        Self::with_policy(backend, PromotionPolicy::default())
    }

    pub fn with_policy(
        backend: Arc<dyn DocumentStore<PatternDocument>>,
        policy: PromotionPolicy,
    ) -> Self {
        Self {
            store: PersistedStore::new(backend),
            policy,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Category used for observations reported without one
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.default_category = resolve_category(Some(category.as_str()), DEFAULT_CATEGORY);
        self
    }

    /// Reports one occurrence of a question
    ///
    /// `None` or a blank category files the question under the default
    /// category (`"general"` unless configured otherwise).
    pub async fn observe(
        &self,
        question: &str,
        category: Option<&str>,
    ) -> Result<LearnedPattern, DomainError> {
        let normalized = normalize_question(question);
        if normalized.is_empty() {
            return Err(DomainError::invalid_input("Question must not be empty"));
        }
        let category = resolve_category(category, &self.default_category);

        self.store
            .mutate(|doc| {
                if let Some(pattern) = doc.find_matching_mut(&normalized, &category) {
                    pattern.observe_again(Utc::now());
                    debug!(
                        pattern_id = %pattern.id(),
                        frequency = pattern.frequency(),
                        "Pattern observed again"
                    );
                    return Ok(Mutation::Changed(pattern.clone()));
                }

                let pattern = LearnedPattern::first_observation(question, category, Utc::now());
                info!(
                    pattern_id = %pattern.id(),
                    category = %pattern.category(),
                    "New pattern observed"
                );
                doc.patterns.push(pattern.clone());
                Ok(Mutation::Changed(pattern))
            })
            .await
    }

    /// Adds a pattern to the curated answer set with the given answer
    pub async fn promote(
        &self,
        id: &PatternId,
        answer: &str,
    ) -> Result<LearnedPattern, DomainError> {
        if answer.trim().is_empty() {
            return Err(DomainError::invalid_input("Answer must not be empty"));
        }

        let promoted = self
            .store
            .mutate(|doc| {
                let pattern = doc
                    .find_mut(id)
                    .ok_or_else(|| DomainError::not_found(format!("Pattern '{}' not found", id)))?;

                pattern.promote(answer);
                Ok(Mutation::Changed(pattern.clone()))
            })
            .await?;

        info!(
            pattern_id = %id,
            frequency = promoted.frequency(),
            "Pattern promoted to training"
        );
        Ok(promoted)
    }

    /// Patterns in ranking order, optionally for one category
    pub async fn list(&self, category: Option<&str>) -> Vec<LearnedPattern> {
        self.store.read(|doc| doc.ranked(category)).await
    }

    /// The `limit` highest ranked patterns
    pub async fn top(&self, limit: usize) -> Vec<LearnedPattern> {
        let mut patterns = self.list(None).await;
        patterns.truncate(limit);
        patterns
    }

    pub async fn get(&self, id: &PatternId) -> Option<LearnedPattern> {
        self.store.read(|doc| doc.find(id).cloned()).await
    }

    /// Deletes a pattern, returning whether it existed
    pub async fn remove(&self, id: &PatternId) -> bool {
        let removed = self
            .store
            .mutate(|doc| {
                let before = doc.patterns.len();
                doc.patterns.retain(|p| p.id() != id);

                if doc.patterns.len() < before {
                    Ok(Mutation::Changed(true))
                } else {
                    Ok(Mutation::Unchanged(false))
                }
            })
            .await
            .unwrap_or_default();

        if removed {
            info!(pattern_id = %id, "Pattern removed");
        }
        removed
    }

    /// Frequent patterns not yet promoted, in ranking order
    pub async fn promotion_candidates(&self) -> Vec<LearnedPattern> {
        let policy = self.policy;
        self.list(None)
            .await
            .into_iter()
            .filter(|p| policy.is_candidate(p))
            .collect()
    }

    pub async fn stats(&self) -> LearningStatsSnapshot {
        let policy = self.policy;
        self.store
            .read(|doc| LearningStatsSnapshot::compute(doc, &policy))
            .await
    }

    /// Statistics and ranked patterns taken from a single read of the state
    pub async fn overview(&self) -> (LearningStatsSnapshot, Vec<LearnedPattern>) {
        let policy = self.policy;
        self.store
            .read(|doc| (LearningStatsSnapshot::compute(doc, &policy), doc.ranked(None)))
            .await
    }

    /// Removes every pattern, returning how many were dropped
    pub async fn reset(&self) -> usize {
        let removed = self
            .store
            .mutate(|doc| {
                let removed = doc.patterns.len();
                *doc = PatternDocument::default();
                Ok(Mutation::Changed(removed))
            })
            .await
            .unwrap_or_default();

        info!(removed, "Learned patterns reset");
        removed
    }

    pub fn policy(&self) -> &PromotionPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockDocumentStore;
    use crate::infrastructure::storage::JsonFileStore;
    use tempfile::TempDir;

    fn service() -> (Arc<MockDocumentStore<PatternDocument>>, PatternLearnerService) {
        let backend = Arc::new(MockDocumentStore::new());
        let service = PatternLearnerService::new(backend.clone());
        (backend, service)
    }

    #[tokio::test]
    async fn test_configured_default_category() {
        let backend = Arc::new(MockDocumentStore::<PatternDocument>::new());
        let service = PatternLearnerService::new(backend).with_default_category("otros");

        let pattern = service.observe("¿Hay cafetería?", Some(" ")).await.unwrap();
        assert_eq!(pattern.category(), "otros");

        let backend = Arc::new(MockDocumentStore::<PatternDocument>::new());
        let blank = PatternLearnerService::new(backend).with_default_category("  ");
        let pattern = blank.observe("¿Hay cafetería?", None).await.unwrap();
        assert_eq!(pattern.category(), "general");
    }

    #[tokio::test]
    async fn test_observe_creates_pattern() {
        let (backend, service) = service();

        let pattern = service.observe("¿Hay cafetería?", None).await.unwrap();

        assert_eq!(pattern.frequency(), 1);
        assert_eq!(pattern.category(), "general");
        assert!(!pattern.added_to_training());
        assert_eq!(backend.write_count(), 1);
    }

    #[tokio::test]
    async fn test_observe_k_times_yields_one_pattern() {
        let (_, service) = service();
        let phrasings = ["Horario?", "  horario?", "HORARIO?  ", "horario?", "Horario?"];

        let mut last = None;
        for q in phrasings {
            last = Some(service.observe(q, None).await.unwrap());
        }

        let patterns = service.list(None).await;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].frequency(), 5);
        assert_eq!(patterns[0].question, "Horario?");
        assert_eq!(patterns[0].id(), last.unwrap().id());
    }

    #[tokio::test]
    async fn test_same_question_in_other_category_is_separate() {
        let (_, service) = service();

        service.observe("Horario?", Some("biblioteca")).await.unwrap();
        service.observe("Horario?", Some("cafeteria")).await.unwrap();

        assert_eq!(service.list(None).await.len(), 2);
        assert_eq!(service.list(Some("biblioteca")).await.len(), 1);
        assert!(service.list(Some("deportes")).await.is_empty());
    }

    #[tokio::test]
    async fn test_bloque_14_scenario() {
        let (_, service) = service();

        for _ in 0..3 {
            service
                .observe("¿Dónde queda el bloque 14?", Some("ubicacion"))
                .await
                .unwrap();
        }

        let stats = service.stats().await;
        assert_eq!(stats.by_category.get("ubicacion"), Some(&1));
        assert_eq!(stats.total_frequent, 1);
        assert_eq!(stats.total_patterns, 1);

        let patterns = service.list(Some("ubicacion")).await;
        assert_eq!(patterns[0].frequency(), 3);
    }

    #[tokio::test]
    async fn test_observe_rejects_blank_question() {
        let (backend, service) = service();

        let result = service.observe(" \n ", Some("general")).await;

        assert!(matches!(result, Err(DomainError::InvalidInput { .. })));
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_promote_is_one_way() {
        let (_, service) = service();
        let pattern = service.observe("Horario?", None).await.unwrap();

        let promoted = service.promote(pattern.id(), "8am-8pm").await.unwrap();
        assert!(promoted.added_to_training());
        assert_eq!(promoted.answer(), Some("8am-8pm"));

        let observed = service.observe("horario?", None).await.unwrap();
        assert_eq!(observed.id(), pattern.id());
        assert!(observed.added_to_training());
        assert_eq!(observed.answer(), Some("8am-8pm"));
        assert_eq!(observed.frequency(), 2);
    }

    #[tokio::test]
    async fn test_promote_unknown_is_not_found() {
        let (backend, service) = service();

        let result = service.promote(&PatternId::generate(), "answer").await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_promote_rejects_blank_answer() {
        let (_, service) = service();
        let pattern = service.observe("Horario?", None).await.unwrap();

        let result = service.promote(pattern.id(), "  ").await;

        assert!(matches!(result, Err(DomainError::InvalidInput { .. })));
        assert!(!service.get(pattern.id()).await.unwrap().added_to_training());
    }

    #[tokio::test]
    async fn test_list_order_is_deterministic() {
        let (_, service) = service();
        for q in ["first", "second", "third"] {
            service.observe(q, None).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        service.observe("third", None).await.unwrap();

        let order: Vec<_> = service
            .list(None)
            .await
            .into_iter()
            .map(|p| p.question)
            .collect();

        assert_eq!(order, vec!["third", "first", "second"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let (backend, service) = service();
        let pattern = service.observe("Horario?", None).await.unwrap();
        let writes_before = backend.write_count();

        assert!(service.remove(pattern.id()).await);
        assert_eq!(backend.write_count(), writes_before + 1);
        assert!(service.get(pattern.id()).await.is_none());

        assert!(!service.remove(pattern.id()).await);
        assert_eq!(backend.write_count(), writes_before + 1);
    }

    #[tokio::test]
    async fn test_promotion_candidates() {
        let backend = Arc::new(MockDocumentStore::<PatternDocument>::new());
        let service = PatternLearnerService::with_policy(backend, PromotionPolicy::new(2));

        service.observe("frequent", None).await.unwrap();
        let frequent = service.observe("frequent", None).await.unwrap();
        service.observe("promoted", None).await.unwrap();
        let promoted = service.observe("promoted", None).await.unwrap();
        service.observe("rare", None).await.unwrap();
        service.promote(promoted.id(), "answer").await.unwrap();

        let candidates = service.promotion_candidates().await;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id(), frequent.id());

        let stats = service.stats().await;
        assert_eq!(stats.total_frequent, 2);
        assert_eq!(stats.total_in_training, 1);
    }

    #[tokio::test]
    async fn test_reset() {
        let (backend, service) = service();
        service.observe("a", None).await.unwrap();
        service.observe("b", Some("x")).await.unwrap();

        assert_eq!(service.reset().await, 2);
        assert_eq!(service.stats().await.total_patterns, 0);
        assert!(backend.stored().unwrap().patterns.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_observes_do_not_lose_updates() {
        let (backend, service) = service();
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for _ in 0..40 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.observe("¿Dónde queda el bloque 14?", None).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let patterns = service.list(None).await;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].frequency(), 40);
        assert_eq!(backend.stored().unwrap().patterns[0].frequency(), 40);
    }

    #[tokio::test]
    async fn test_patterns_survive_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("learned_patterns.json");

        let service =
            PatternLearnerService::new(Arc::new(JsonFileStore::<PatternDocument>::new(&path)));
        let pattern = service.observe("Horario?", Some("biblioteca")).await.unwrap();
        service.promote(pattern.id(), "8am-8pm").await.unwrap();

        let reopened =
            PatternLearnerService::new(Arc::new(JsonFileStore::<PatternDocument>::new(&path)));
        let restored = reopened.get(pattern.id()).await.unwrap();
        assert!(restored.added_to_training());
        assert_eq!(restored.category(), "biblioteca");

        let observed = reopened.observe("horario?", Some("biblioteca")).await.unwrap();
        assert_eq!(observed.id(), pattern.id());
        assert_eq!(observed.frequency(), 2);
    }
}
