//! Storage factory for runtime backend selection

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::storage::{DocumentStore, StorageDocument};
use crate::domain::DomainError;

use super::in_memory::InMemoryDocumentStore;
use super::json_file::JsonFileStore;

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// One JSON file per store
    File,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "file" | "json" | "json-file" | "json_file" => Some(Self::File),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// File storage rooted at a data directory
    File { data_dir: PathBuf },
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a file storage configuration
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self::File {
            data_dir: data_dir.into(),
        }
    }

    /// Builds a configuration from a backend name
    pub fn from_backend(backend: &str, data_dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        match StorageType::from_str(backend) {
            Some(StorageType::InMemory) => Ok(Self::in_memory()),
            Some(StorageType::File) => Ok(Self::file(data_dir)),
            None => Err(DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                backend
            ))),
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::File { .. } => StorageType::File,
        }
    }
}

/// Factory for creating document stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a document store based on the configuration
    pub fn create<D>(config: &StorageConfig, file_name: &str) -> Arc<dyn DocumentStore<D>>
    where
        D: StorageDocument,
    {
        match config {
            StorageConfig::InMemory => Arc::new(InMemoryDocumentStore::<D>::new()),
            StorageConfig::File { data_dir } => {
                Arc::new(JsonFileStore::<D>::new(data_dir.join(file_name)))
            }
        }
    }
}
