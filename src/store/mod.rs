//! Store Module
//!
//! The key-value store boundary that cache keys and invalidation run against.

mod entry;
mod memory;
mod redis_store;
mod stats;

pub use entry::StoreEntry;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use stats::StoreStats;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

// == Cache Repository ==
/// Generic key-value cache operations.
///
/// Values are opaque strings; [`CacheKey`](crate::keys::CacheKey) encodes typed
/// values as JSON on top of this.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// Returns the value stored under `key`, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` until `expires_at`.
    async fn put(&self, key: &str, value: String, expires_at: DateTime<Utc>) -> Result<()>;

    /// Returns true if `key` holds a live value.
    async fn has(&self, key: &str) -> Result<bool>;

    /// Removes `key`. Succeeds whether or not the key existed.
    async fn forget(&self, key: &str) -> Result<bool>;

    /// Removes every key in `keys` with the generic delete path.
    async fn delete_multiple(&self, keys: &[String]) -> Result<bool>;

    /// Bulk-unlink fast path, when the backing engine has one.
    fn bulk_unlink(&self) -> Option<&dyn BulkUnlink> {
        None
    }
}

// == Bulk Unlink ==
/// Non-blocking multi-key deletion primitive (Redis `UNLINK`).
#[async_trait]
pub trait BulkUnlink: Send + Sync {
    /// Unlinks `keys`, returning how many existed.
    async fn unlink(&self, keys: &[String]) -> Result<u64>;
}
