//! Storage document traits

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for the full state of a store that is persisted as one document
///
/// `Default` is the empty store: it is what a missing or unreadable document
/// hydrates to.
pub trait StorageDocument:
    Clone + Debug + Default + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Short name of the document, used in log messages
    fn document_name() -> &'static str;
}
