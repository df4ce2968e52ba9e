//! Testing Helpers
//!
//! A recording [`AsyncCache`] for asserting which keys application code purges.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::invalidation::AsyncCache;

/// One recorded `delete_multiple_async` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub keys: Vec<String>,
    pub chunk_size: usize,
}

#[derive(Debug, Default)]
struct Recorded {
    deleted_keys: Vec<String>,
    calls: Vec<RecordedCall>,
}

// == Recording Async Cache ==
/// [`AsyncCache`] double that records calls instead of touching a store.
///
/// Every call succeeds. The `assert_*` helpers panic with the recorded keys
/// in the message, so they read well in test output.
#[derive(Debug, Default)]
pub struct RecordingAsyncCache {
    recorded: Mutex<Recorded>,
}

impl RecordingAsyncCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        // A panicking assertion elsewhere must not poison later reads
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All keys passed to any call, in order, duplicates included.
    pub fn deleted_keys(&self) -> Vec<String> {
        self.lock().deleted_keys.clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls recorded for `method`.
    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.method == method)
            .cloned()
            .collect()
    }

    pub fn clear_deleted_keys(&self) {
        self.lock().deleted_keys.clear();
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn reset(&self) {
        let mut recorded = self.lock();
        recorded.deleted_keys.clear();
        recorded.calls.clear();
    }

    // == Assertions ==
    pub fn assert_key_count(&self, expected: usize) {
        let deleted = self.deleted_keys();
        assert_eq!(
            deleted.len(),
            expected,
            "expected {} deleted cache keys, got {}: [{}]",
            expected,
            deleted.len(),
            deleted.join(", ")
        );
    }

    pub fn assert_key_deleted(&self, key: &str) {
        let deleted = self.deleted_keys();
        assert!(
            deleted.iter().any(|k| k == key),
            "cache key [{}] was not deleted. Deleted keys: [{}]",
            key,
            deleted.join(", ")
        );
    }

    pub fn assert_keys_deleted(&self, keys: &[&str]) {
        let deleted = self.deleted_keys();
        let missing: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|key| !deleted.iter().any(|k| k == key))
            .collect();
        assert!(
            missing.is_empty(),
            "cache keys were not deleted: [{}]. Deleted keys: [{}]",
            missing.join(", "),
            deleted.join(", ")
        );
    }

    /// Asserts some `delete_multiple_async` call had exactly these arguments.
    pub fn assert_called_with(&self, keys: &[String], chunk_size: usize) {
        let calls = self.calls_to("delete_multiple_async");
        assert!(
            !calls.is_empty(),
            "delete_multiple_async was never called"
        );
        assert!(
            calls
                .iter()
                .any(|call| call.keys == keys && call.chunk_size == chunk_size),
            "no delete_multiple_async call with keys {:?} and chunk size {}. Actual calls: {:?}",
            keys,
            chunk_size,
            calls
        );
    }
}

#[async_trait]
impl AsyncCache for RecordingAsyncCache {
    async fn delete_multiple_async(&self, keys: &[String], chunk_size: usize) -> bool {
        let mut recorded = self.lock();
        recorded.calls.push(RecordedCall {
            method: "delete_multiple_async",
            keys: keys.to_vec(),
            chunk_size,
        });
        recorded.deleted_keys.extend_from_slice(keys);
        true
    }
}
