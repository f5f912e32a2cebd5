//! JSON file document store
//!
//! Each store is one pretty-printed JSON document. Writes go to a temp file
//! next to the target and are then renamed over it, so readers never observe
//! a half-written document.

use std::fmt::Debug;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::storage::{DocumentStore, StorageDocument};
use crate::domain::DomainError;

/// Document store persisting to a single JSON file
pub struct JsonFileStore<D>
where
    D: StorageDocument,
{
    path: PathBuf,
    _phantom: PhantomData<D>,
}

impl<D> Debug for JsonFileStore<D>
where
    D: StorageDocument,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .field("document", &D::document_name())
            .finish()
    }
}

impl<D> JsonFileStore<D>
where
    D: StorageDocument,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _phantom: PhantomData,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| D::document_name().to_string());

        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
    }
}

#[async_trait]
impl<D> DocumentStore<D> for JsonFileStore<D>
where
    D: StorageDocument,
{
    async fn read(&self) -> Result<Option<D>, DomainError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let document = serde_json::from_str(&content).map_err(|e| {
            DomainError::storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        Ok(Some(document))
    }

    async fn write(&self, document: &D) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let serialized = serde_json::to_string_pretty(document).map_err(|e| {
            DomainError::storage(format!("Failed to serialize {}: {}", D::document_name(), e))
        })?;

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, serialized.as_bytes())
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(DomainError::storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        debug!(
            path = %self.path.display(),
            bytes = serialized.len(),
            "Wrote {} document",
            D::document_name()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
