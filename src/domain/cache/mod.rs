//! Cache domain - Reusable question/answer exchanges

mod entry;
mod key;
mod stats;

pub use entry::{CacheDocument, CacheEntry};
pub use key::{normalize_question, QuestionKey};
pub use stats::{CacheStatsSnapshot, EstimatedSavings, DEFAULT_PER_CALL_COST};
