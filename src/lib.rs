//! has_cache - Template-keyed cache keys with chunked invalidation
//!
//! Builds cache keys from named templates, picks TTLs by active hours, and
//! purges key batches in chunks through a pluggable store.

pub mod config;
pub mod error;
pub mod invalidation;
pub mod keys;
pub mod scaffold;
pub mod store;
pub mod testing;

pub use config::Config;
pub use error::{CacheError, Result};
pub use invalidation::{AsyncCache, CacheObserver, ChunkedDeleter, HasCacheKeys};
pub use keys::{ActiveHours, CacheKey, CacheKeyBuilder, Template, TemplateRegistry, Templates, Ttl};
pub use store::{CacheRepository, MemoryStore, RedisStore};
