//! Storage infrastructure - Document store implementations

mod factory;
mod in_memory;
mod json_file;
mod persisted;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryDocumentStore;
pub use json_file::JsonFileStore;
pub use persisted::{Mutation, PersistedStore};
