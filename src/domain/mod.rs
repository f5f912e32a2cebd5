//! Domain layer - Core entities, policies and read models

pub mod activity;
pub mod cache;
pub mod error;
pub mod learning;
pub mod storage;

pub use activity::{ActivitySnapshot, ExternalCounts, TimeWindow, WindowActivity};
pub use cache::{CacheEntry, CacheStatsSnapshot, EstimatedSavings, QuestionKey};
pub use error::DomainError;
pub use learning::{
    LearnedPattern, LearningStatsSnapshot, PatternId, PromotionPolicy, DEFAULT_CATEGORY,
};
pub use storage::{DocumentStore, StorageDocument};
