//! Chunked Deleter Module
//!
//! Best-effort bulk deletion that splits large batches across unlink calls.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::store::CacheRepository;

/// Keys per unlink call when no chunk size is given.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

// == Async Cache ==
/// Bulk invalidation entry point.
///
/// Deletion is best-effort: the boolean reports whether the request was
/// dispatched, not that every key is gone. A lost deletion leaves a stale
/// entry until its TTL runs out.
#[async_trait]
pub trait AsyncCache: Send + Sync {
    /// Deletes `keys`, splitting them into chunks of at most `chunk_size`
    /// when the store has a bulk-unlink fast path.
    async fn delete_multiple_async(&self, keys: &[String], chunk_size: usize) -> bool;

    /// Deletes `keys` with [`DEFAULT_CHUNK_SIZE`].
    async fn delete_keys(&self, keys: &[String]) -> bool {
        self.delete_multiple_async(keys, DEFAULT_CHUNK_SIZE).await
    }
}

// == Chunked Deleter ==
/// [`AsyncCache`] over a [`CacheRepository`].
#[derive(Clone)]
pub struct ChunkedDeleter {
    store: Arc<dyn CacheRepository>,
}

impl ChunkedDeleter {
    pub fn new(store: Arc<dyn CacheRepository>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CacheRepository> {
        &self.store
    }

    async fn delete_generic(&self, keys: &[String]) -> bool {
        match self.store.delete_multiple(keys).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("Bulk delete of {} keys failed: {}", keys.len(), e);
                false
            }
        }
    }
}

#[async_trait]
impl AsyncCache for ChunkedDeleter {
    async fn delete_multiple_async(&self, keys: &[String], chunk_size: usize) -> bool {
        if keys.is_empty() {
            return true;
        }

        let chunk_size = chunk_size.max(1);

        let unlink = match self.store.bulk_unlink() {
            Some(unlink) if chunk_size < keys.len() => unlink,
            _ => return self.delete_generic(keys).await,
        };

        let mut dispatched = 0;
        for chunk in keys.chunks(chunk_size) {
            // Failed chunks are not retried; later chunks still go out
            match unlink.unlink(chunk).await {
                Ok(unlinked) => debug!("Unlinked chunk: {} of {} keys", unlinked, chunk.len()),
                Err(e) => warn!("Unlink of {} keys failed: {}", chunk.len(), e),
            }
            dispatched += 1;
        }

        debug!(
            "Dispatched {} keys in {} chunks of at most {}",
            keys.len(),
            dispatched,
            chunk_size
        );
        true
    }
}
