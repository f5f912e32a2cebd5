//! Write-through holder of a store's full state
//!
//! The in-memory copy is the source of truth once hydrated. Every mutation
//! runs under one async mutex together with its write-back, so concurrent
//! callers are serialized and documents reach the backend in program order.

use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::domain::storage::{DocumentStore, StorageDocument};
use crate::domain::DomainError;

/// Outcome of a read-modify-write closure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<R> {
    /// State changed and must be written back
    Changed(R),
    /// Nothing changed, skip the write
    Unchanged(R),
}

impl<R> Mutation<R> {
    fn into_parts(self) -> (R, bool) {
        match self {
            Mutation::Changed(value) => (value, true),
            Mutation::Unchanged(value) => (value, false),
        }
    }
}

/// Lazily hydrated, write-through persisted state
pub struct PersistedStore<D>
where
    D: StorageDocument,
{
    backend: Arc<dyn DocumentStore<D>>,
    state: Mutex<Option<D>>,
}

impl<D> Debug for PersistedStore<D>
where
    D: StorageDocument,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("document", &D::document_name())
            .field("backend", &self.backend)
            .finish()
    }
}

impl<D> PersistedStore<D>
where
    D: StorageDocument,
{
    pub fn new(backend: Arc<dyn DocumentStore<D>>) -> Self {
        Self {
            backend,
            state: Mutex::new(None),
        }
    }

    /// Returns a copy of the current state, hydrating on first use
    pub async fn load(&self) -> D {
        let mut slot = self.state.lock().await;
        self.hydrated(&mut slot).await.clone()
    }

    /// Replaces the whole state and writes it through
    pub async fn save(&self, state: D) {
        let mut slot = self.state.lock().await;
        let current = slot.insert(state);
        self.persist(current).await;
    }

    /// Runs a read-only projection over the current state
    pub async fn read<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        let mut slot = self.state.lock().await;
        f(self.hydrated(&mut slot).await)
    }

    /// Runs a read-modify-write as one atomic unit
    ///
    /// The closure must leave the state untouched when it returns an error.
    /// A failed write-back is logged and does not fail the operation.
    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut D) -> Result<Mutation<R>, DomainError>,
    ) -> Result<R, DomainError> {
        let mut slot = self.state.lock().await;
        let state = self.hydrated(&mut slot).await;

        let (value, changed) = f(&mut *state)?.into_parts();
        if changed {
            self.persist(state).await;
        }

        Ok(value)
    }

    /// Whether the durable document has been read yet
    pub async fn is_hydrated(&self) -> bool {
        self.state.lock().await.is_some()
    }

    async fn hydrated<'a>(&self, slot: &'a mut Option<D>) -> &'a mut D {
        if slot.is_none() {
            *slot = Some(self.hydrate().await);
        }
        slot.get_or_insert_with(D::default)
    }

    async fn hydrate(&self) -> D {
        match self.backend.read().await {
            Ok(Some(document)) => {
                debug!(
                    location = %self.backend.location(),
                    "Loaded {} document",
                    D::document_name()
                );
                document
            }
            Ok(None) => {
                debug!(
                    location = %self.backend.location(),
                    "No {} document yet, starting empty",
                    D::document_name()
                );
                D::default()
            }
            Err(e) => {
                warn!(
                    location = %self.backend.location(),
                    error = %e,
                    "Could not load {} document, starting empty",
                    D::document_name()
                );
                D::default()
            }
        }
    }

    async fn persist(&self, state: &D) {
        if let Err(e) = self.backend.write(state).await {
            error!(
                location = %self.backend.location(),
                error = %e,
                "Persistence failed for {} document; keeping in-memory state",
                D::document_name()
            );
        }
    }
}
