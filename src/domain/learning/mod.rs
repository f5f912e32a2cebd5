//! Learning domain - Recurring question patterns and their promotion

mod pattern;
mod policy;
mod stats;

pub use pattern::{
    resolve_category, LearnedPattern, PatternDocument, PatternId, DEFAULT_CATEGORY,
};
pub use policy::{PromotionPolicy, DEFAULT_PROMOTION_THRESHOLD};
pub use stats::LearningStatsSnapshot;
