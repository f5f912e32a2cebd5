//! In-memory document store implementation

use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{DocumentStore, StorageDocument};
use crate::domain::DomainError;

/// Thread-safe in-memory document store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryDocumentStore<D>
where
    D: StorageDocument,
{
    document: RwLock<Option<D>>,
}

impl<D> Default for InMemoryDocumentStore<D>
where
    D: StorageDocument,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D> InMemoryDocumentStore<D>
where
    D: StorageDocument,
{
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            document: RwLock::new(None),
        }
    }

    /// Creates a store that already holds a document
    pub fn with_document(document: D) -> Self {
        Self {
            document: RwLock::new(Some(document)),
        }
    }
}

#[async_trait]
impl<D> DocumentStore<D> for InMemoryDocumentStore<D>
where
    D: StorageDocument,
{
    async fn read(&self) -> Result<Option<D>, DomainError> {
        let document = self.document.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(document.clone())
    }

    async fn write(&self, document: &D) -> Result<(), DomainError> {
        let mut slot = self.document.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        *slot = Some(document.clone());
        Ok(())
    }

    fn location(&self) -> String {
        format!("memory://{}", D::document_name())
    }
}
