//! Response cache service - reuse of prior question/answer exchanges

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::cache::{
    CacheDocument, CacheEntry, CacheStatsSnapshot, QuestionKey, DEFAULT_PER_CALL_COST,
};
use crate::domain::storage::DocumentStore;
use crate::domain::DomainError;
use crate::infrastructure::storage::{Mutation, PersistedStore};

/// Configuration for the response cache
#[derive(Debug, Clone)]
pub struct ResponseCacheConfig {
    /// Estimated dollars saved per served hit
    pub per_call_cost: f64,
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            per_call_cost: DEFAULT_PER_CALL_COST,
        }
    }
}

impl ResponseCacheConfig {
    pub fn with_per_call_cost(mut self, per_call_cost: f64) -> Self {
        self.per_call_cost = per_call_cost.max(0.0);
        self
    }
}

/// Service caching answers by normalized question text
///
/// Lookups are exact matches on the normalized key. Callers that want fuzzy
/// matching must resolve the question to a known phrasing before calling in.
#[derive(Debug)]
pub struct ResponseCacheService {
    store: PersistedStore<CacheDocument>,
    config: ResponseCacheConfig,
}

impl ResponseCacheService {
    pub fn new(backend: Arc<dyn DocumentStore<CacheDocument>>) -> Self {
        Self::with_config(backend, ResponseCacheConfig::default())
    }

    pub fn with_config(
        backend: Arc<dyn DocumentStore<CacheDocument>>,
        config: ResponseCacheConfig,
    ) -> Self {
        Self {
            store: PersistedStore::new(backend),
            config,
        }
    }

    /// Finds the cached exchange for a question, if any
    pub async fn lookup(&self, question: &str) -> Result<Option<CacheEntry>, DomainError> {
        let key = QuestionKey::from_question(question)?;
        let entry = self.store.read(|doc| doc.get(&key).cloned()).await;

        debug!(key = %key, hit = entry.is_some(), "Cache lookup");
        Ok(entry)
    }

    /// Stores an exchange. An existing entry for the same key is kept as-is.
    pub async fn record(&self, question: &str, answer: &str) -> Result<CacheEntry, DomainError> {
        let key = QuestionKey::from_question(question)?;

        if answer.trim().is_empty() {
            return Err(DomainError::invalid_input("Answer must not be empty"));
        }

        self.store
            .mutate(|doc| {
                if let Some(existing) = doc.get(&key) {
                    return Ok(Mutation::Unchanged(existing.clone()));
                }

                let entry = CacheEntry::new(key.clone(), question.trim(), answer, Utc::now());
                doc.entries.insert(key.clone(), entry.clone());
                info!(key = %key, "Cached new response");
                Ok(Mutation::Changed(entry))
            })
            .await
    }

    /// Accounts one served hit for a cached question
    ///
    /// Fails with `NotFound` when nothing is cached for the question yet.
    pub async fn record_hit(&self, question: &str) -> Result<CacheEntry, DomainError> {
        let key = QuestionKey::from_question(question)?;

        self.store
            .mutate(|doc| {
                let entry = doc.entries.get_mut(&key).ok_or_else(|| {
                    DomainError::not_found(format!("No cached response for '{}'", key))
                })?;

                entry.record_hit(Utc::now());
                debug!(key = %key, hits = entry.hits(), "Cache hit recorded");
                Ok(Mutation::Changed(entry.clone()))
            })
            .await
    }

    /// Current statistics, computed over the live state
    pub async fn stats(&self) -> CacheStatsSnapshot {
        let per_call_cost = self.config.per_call_cost;
        self.store
            .read(|doc| CacheStatsSnapshot::compute(doc, per_call_cost))
            .await
    }

    /// Statistics and ranked entries taken from a single read of the state
    pub async fn overview(&self) -> (CacheStatsSnapshot, Vec<CacheEntry>) {
        let per_call_cost = self.config.per_call_cost;
        self.store
            .read(|doc| (CacheStatsSnapshot::compute(doc, per_call_cost), doc.ranked()))
            .await
    }

    /// All entries, most served first
    pub async fn entries(&self) -> Vec<CacheEntry> {
        self.store.read(CacheDocument::ranked).await
    }

    /// The `limit` most served entries
    pub async fn top(&self, limit: usize) -> Vec<CacheEntry> {
        let mut entries = self.entries().await;
        entries.truncate(limit);
        entries
    }

    /// Removes every entry, returning how many were dropped
    pub async fn reset(&self) -> usize {
        let removed = self
            .store
            .mutate(|doc| {
                let removed = doc.len();
                *doc = CacheDocument::default();
                Ok(Mutation::Changed(removed))
            })
            .await
            .unwrap_or_default();

        info!(removed, "Response cache reset");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockDocumentStore;
    use crate::infrastructure::storage::JsonFileStore;
    use tempfile::TempDir;

    fn service() -> (Arc<MockDocumentStore<CacheDocument>>, ResponseCacheService) {
        let backend = Arc::new(MockDocumentStore::new());
        let service = ResponseCacheService::new(backend.clone());
        (backend, service)
    }

    #[tokio::test]
    async fn test_lookup_miss() {
        let (_, service) = service();
        assert!(service.lookup("¿Hay parqueadero?").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_then_lookup_normalized() {
        let (_, service) = service();

        service
            .record("¿Cuál es el horario de la biblioteca?", "8am-8pm")
            .await
            .unwrap();

        let entry = service
            .lookup("  ¿cuál es el horario de la biblioteca?  ")
            .await
            .unwrap()
            .expect("normalized question should hit");
        assert_eq!(entry.answer, "8am-8pm");
        assert_eq!(entry.question, "¿Cuál es el horario de la biblioteca?");
    }

    #[tokio::test]
    async fn test_lookup_collapses_internal_whitespace() {
        let (_, service) = service();
        service.record("Horario de   la Biblioteca", "8am-8pm").await.unwrap();

        let entry = service.lookup("horario de la\tbiblioteca").await.unwrap();
        assert_eq!(entry.unwrap().answer, "8am-8pm");
    }

    #[tokio::test]
    async fn test_record_creates_cold_entry_and_persists() {
        let (backend, service) = service();

        let entry = service.record("Horario?", "8am-8pm").await.unwrap();

        assert_eq!(entry.hits(), 0);
        assert!(entry.last_used_at().is_none());
        assert_eq!(backend.write_count(), 1);
        assert_eq!(backend.stored().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_existing_keeps_entry() {
        let (backend, service) = service();
        service.record("Horario?", "8am-8pm").await.unwrap();
        service.record_hit("Horario?").await.unwrap();

        let entry = service.record("  HORARIO? ", "otra respuesta").await.unwrap();

        assert_eq!(entry.answer, "8am-8pm");
        assert_eq!(entry.hits(), 1);
        assert_eq!(backend.write_count(), 2);
    }

    #[tokio::test]
    async fn test_record_rejects_blank_input() {
        let (backend, service) = service();

        assert!(matches!(
            service.record("   ", "answer").await,
            Err(DomainError::InvalidInput { .. })
        ));
        assert!(matches!(
            service.record("question", " ").await,
            Err(DomainError::InvalidInput { .. })
        ));
        assert!(matches!(
            service.lookup("").await,
            Err(DomainError::InvalidInput { .. })
        ));
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_record_hit_unknown_is_not_found() {
        let (backend, service) = service();

        let result = service.record_hit("never cached").await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_record_hit_n_times() {
        let (_, service) = service();
        service.record("Horario?", "8am-8pm").await.unwrap();

        for _ in 0..4 {
            service.record_hit("horario?").await.unwrap();
        }
        let before_last = Utc::now();
        let entry = service.record_hit("HORARIO?").await.unwrap();
        let after_last = Utc::now();

        assert_eq!(entry.hits(), 5);
        let last_used = entry.last_used_at().unwrap();
        assert!(last_used >= before_last && last_used <= after_last);

        let stored = service.lookup("horario?").await.unwrap().unwrap();
        assert_eq!(stored, entry);
    }

    #[tokio::test]
    async fn test_stats_empty_store() {
        let (_, service) = service();
        let stats = service.stats().await;

        assert_eq!(stats, CacheStatsSnapshot::empty());
        assert_eq!(stats.avg_hits_per_entry, 0.0);
    }

    #[tokio::test]
    async fn test_stats_with_configured_cost() {
        let backend = Arc::new(MockDocumentStore::<CacheDocument>::new());
        let config = ResponseCacheConfig::default().with_per_call_cost(0.5);
        let service = ResponseCacheService::with_config(backend, config);

        service.record("a", "1").await.unwrap();
        service.record("b", "2").await.unwrap();
        service.record_hit("a").await.unwrap();
        service.record_hit("a").await.unwrap();

        let stats = service.stats().await;
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_hits, 2);
        assert_eq!(stats.used_entries, 1);
        assert_eq!(stats.avg_hits_per_entry, 1.0);
        assert_eq!(stats.estimated_savings.api_calls, 2);
        assert_eq!(stats.estimated_savings.dollars, 1.0);
    }

    #[tokio::test]
    async fn test_reset_clears_entries_and_counters() {
        let (backend, service) = service();
        let questions = ["q1", "q2", "q3", "q4", "q5"];
        for q in questions {
            service.record(q, "answer").await.unwrap();
        }
        for i in 0..20 {
            service.record_hit(questions[i % questions.len()]).await.unwrap();
        }
        assert_eq!(service.stats().await.total_hits, 20);

        let removed = service.reset().await;

        assert_eq!(removed, 5);
        let stats = service.stats().await;
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_hits, 0);
        for q in questions {
            assert!(service.lookup(q).await.unwrap().is_none());
        }
        assert!(backend.stored().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_top_entries() {
        let (_, service) = service();
        service.record("rare", "1").await.unwrap();
        service.record("popular", "2").await.unwrap();
        service.record_hit("popular").await.unwrap();

        let top = service.top(1).await;
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].question, "popular");
    }

    #[tokio::test]
    async fn test_write_failure_does_not_fail_operations() {
        let backend =
            Arc::new(MockDocumentStore::<CacheDocument>::new().with_write_error("read-only fs"));
        let service = ResponseCacheService::new(backend.clone());

        service.record("Horario?", "8am-8pm").await.unwrap();
        let entry = service.record_hit("Horario?").await.unwrap();

        assert_eq!(entry.hits(), 1);
        assert_eq!(backend.write_count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_recovers_and_rewrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("response_cache.json");
        std::fs::write(&path, "{\"entries\": [oops").unwrap();

        let backend = Arc::new(JsonFileStore::<CacheDocument>::new(&path));
        let service = ResponseCacheService::new(backend);
        assert_eq!(service.stats().await.total_entries, 0);

        service.record("Horario?", "8am-8pm").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let document: CacheDocument = serde_json::from_str(&content).unwrap();
        assert_eq!(document.len(), 1);

        let backend = Arc::new(JsonFileStore::<CacheDocument>::new(&path));
        let reopened = ResponseCacheService::new(backend);
        let entry = reopened.lookup("horario?").await.unwrap().unwrap();
        assert_eq!(entry.answer, "8am-8pm");
    }
}
