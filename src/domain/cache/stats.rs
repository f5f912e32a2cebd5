//! Response cache statistics

use serde::Serialize;

use super::entry::CacheDocument;

/// Default estimated cost of one avoided LLM call, in dollars
pub const DEFAULT_PER_CALL_COST: f64 = 0.002;

/// Estimated savings from serving cached answers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimatedSavings {
    pub api_calls: u64,
    pub dollars: f64,
}

/// Point-in-time statistics of the response cache
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatsSnapshot {
    pub total_entries: usize,
    pub total_hits: u64,
    /// Entries served at least once
    pub used_entries: usize,
    pub avg_hits_per_entry: f64,
    pub estimated_savings: EstimatedSavings,
}

impl CacheStatsSnapshot {
    /// Computes the snapshot over the given cache state
    pub fn compute(document: &CacheDocument, per_call_cost: f64) -> Self {
        let total_entries = document.len();
        let total_hits: u64 = document.entries.values().map(|e| e.hits()).sum();
        let used_entries = document.entries.values().filter(|e| e.is_used()).count();

        let avg_hits_per_entry = if total_entries == 0 {
            0.0
        } else {
            total_hits as f64 / total_entries as f64
        };

        Self {
            total_entries,
            total_hits,
            used_entries,
            avg_hits_per_entry,
            estimated_savings: EstimatedSavings {
                api_calls: total_hits,
                dollars: total_hits as f64 * per_call_cost,
            },
        }
    }

    /// Snapshot of an empty cache
    pub fn empty() -> Self {
        Self::compute(&CacheDocument::default(), DEFAULT_PER_CALL_COST)
    }
}
