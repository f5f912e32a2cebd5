//! Document store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageDocument;

/// Durable backend holding exactly one document per store
///
/// Writes always replace the whole document; there are no partial or append
/// writes.
#[async_trait]
pub trait DocumentStore<D>: Send + Sync + Debug
where
    D: StorageDocument,
{
    /// Reads the document. `Ok(None)` means nothing has been written yet.
    async fn read(&self) -> Result<Option<D>, DomainError>;

    /// Overwrites the document with the given state
    async fn write(&self, document: &D) -> Result<(), DomainError>;

    /// Human readable location of the document, for logs
    fn location(&self) -> String;
}
