//! Store Statistics Module
//!
//! Counts reads and deletion calls made against the in-memory store.

// == Store Stats ==
/// Tracks store activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Reads that found a live value
    pub hits: u64,
    /// Reads that found nothing or an expired value
    pub misses: u64,
    /// Single-key `forget` calls
    pub forgets: u64,
    /// Generic `delete_multiple` calls
    pub bulk_deletes: u64,
    /// Fast-path `unlink` calls
    pub unlink_calls: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl StoreStats {
    // == Constructor ==
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total deletion calls of any kind.
    pub fn deletion_calls(&self) -> u64 {
        self.forgets + self.bulk_deletes + self.unlink_calls
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_forget(&mut self) {
        self.forgets += 1;
    }

    pub fn record_bulk_delete(&mut self) {
        self.bulk_deletes += 1;
    }

    pub fn record_unlink(&mut self) {
        self.unlink_calls += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StoreStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.deletion_calls(), 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_read_counters() {
        let mut stats = StoreStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        assert_eq!((stats.hits, stats.misses), (1, 2));
    }

    #[test]
    fn test_deletion_calls_sum_all_paths() {
        let mut stats = StoreStats::new();
        stats.record_forget();
        stats.record_bulk_delete();
        stats.record_unlink();
        stats.record_unlink();
        assert_eq!(stats.deletion_calls(), 4);
    }
}
