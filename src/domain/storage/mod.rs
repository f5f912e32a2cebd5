//! Storage domain - Durable document abstraction layer

mod entity;
mod repository;

pub use entity::StorageDocument;
pub use repository::DocumentStore;

#[cfg(test)]
pub use repository::mock;
