//! Activity domain - Read-only projections over the cache and learner

mod snapshot;
mod window;

pub use snapshot::{ActivitySnapshot, ExternalCounts, TopPattern, TopQuestion, WindowActivity};
pub use window::TimeWindow;
