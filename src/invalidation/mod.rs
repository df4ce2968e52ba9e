//! Invalidation Module
//!
//! Chunked bulk deletion, entity lifecycle hooks and scoped suppression.

mod deleter;
mod observer;
mod suppression;


pub use deleter::{AsyncCache, ChunkedDeleter, DEFAULT_CHUNK_SIZE};
pub use observer::{CacheKeySet, CacheObserver, CacheSnapshot, HasCacheKeys, PendingPurge};
pub use suppression::{PurgeSuppression, SuppressionGuard};
