//! Memory Store Module
//!
//! In-process store with absolute expiries, for local use and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::store::{BulkUnlink, CacheRepository, StoreEntry, StoreStats};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, StoreEntry>,
    stats: StoreStats,
}

impl Inner {
    fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }
}

// == Memory Store ==
/// In-memory [`CacheRepository`].
///
/// Expired entries are dropped lazily on access or by
/// [`cleanup_expired`](MemoryStore::cleanup_expired). The bulk-unlink fast path
/// is off by default, matching a plain array-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    unlink_enabled: bool,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that advertises the bulk-unlink fast path.
    pub fn with_unlink() -> Self {
        Self {
            inner: RwLock::default(),
            unlink_enabled: true,
        }
    }

    // == Stats ==
    /// Returns current store statistics.
    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.read().await;
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - inner.entries.len();
        let total = inner.entries.len();
        inner.stats.set_total_entries(total);
        removed
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[async_trait]
impl CacheRepository for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut inner = self.inner.write().await;

        let expired = inner.entries.get(key).map(StoreEntry::is_expired);
        let live = match expired {
            Some(false) => inner.entries.get(key).map(|entry| entry.value.clone()),
            Some(true) => {
                inner.remove(key);
                None
            }
            None => None,
        };

        match live {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        Ok(live)
    }

    async fn put(&self, key: &str, value: String, expires_at: DateTime<Utc>) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .entries
            .insert(key.to_string(), StoreEntry::new(value, expires_at));
        let total = inner.entries.len();
        inner.stats.set_total_entries(total);
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired()))
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        inner.stats.record_forget();
        inner.remove(key);
        Ok(true)
    }

    async fn delete_multiple(&self, keys: &[String]) -> Result<bool> {
        let mut inner = self.inner.write().await;
        inner.stats.record_bulk_delete();
        for key in keys {
            inner.remove(key);
        }
        debug!("Deleted {} keys from memory store", keys.len());
        Ok(true)
    }

    fn bulk_unlink(&self) -> Option<&dyn BulkUnlink> {
        if self.unlink_enabled {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl BulkUnlink for MemoryStore {
    async fn unlink(&self, keys: &[String]) -> Result<u64> {
        let mut inner = self.inner.write().await;
        inner.stats.record_unlink();
        let removed = keys.iter().filter(|key| inner.remove(key)).count();
        Ok(removed as u64)
    }
}
