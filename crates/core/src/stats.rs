//! Hit/miss accounting shared by the TLB and the frame table.

use serde::Serialize;

/// Monotonic hit and miss counters.
///
/// For the frame table a miss is a page fault. Counters only go back to
/// zero through [`Stats::reset`], which the engines call from their
/// explicit flush/reset operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub hits: u64,
    pub misses: u64,
}

impl Stats {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate as a percentage in `[0, 100]`; `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64 * 100.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
