//! Cache Observer Module
//!
//! Entity lifecycle hooks that purge the cache keys an entity owns.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::invalidation::{AsyncCache, PurgeSuppression, DEFAULT_CHUNK_SIZE};
use crate::keys::CacheKey;

/// Deduplicated set of cache keys owned by an entity.
pub type CacheKeySet = BTreeSet<String>;

// == Has Cache Keys ==
/// Implemented by entities whose cached data must be purged when they change.
pub trait HasCacheKeys {
    /// Keys derived from the entity's current state.
    fn cache_keys(&self) -> CacheKeySet {
        CacheKeySet::new()
    }
}

// == Cache Snapshot ==
/// Keys of an entity as they were before an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    keys: CacheKeySet,
}

impl CacheSnapshot {
    pub fn keys(&self) -> &CacheKeySet {
        &self.keys
    }
}

// == Pending Purge ==
/// Keys queued for deletion once a unit of work commits.
///
/// Dropping a pending purge without passing it to
/// [`CacheObserver::commit`] discards it, which is what a rollback should do.
#[derive(Debug, Default)]
pub struct PendingPurge {
    keys: Vec<String>,
}

impl PendingPurge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &CacheKey) {
        self.keys.push(key.key().to_string());
    }

    pub fn extend<'a>(&mut self, keys: impl IntoIterator<Item = &'a CacheKey>) {
        self.keys.extend(keys.into_iter().map(|key| key.key().to_string()));
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// == Cache Observer ==
/// Purges entity cache keys on update, save and delete.
///
/// All hooks are no-ops while [`suppression`](CacheObserver::suppression) is
/// active. Suppression is per observer, so independent observers never see
/// each other's scopes.
pub struct CacheObserver {
    cache: Arc<dyn AsyncCache>,
    suppression: PurgeSuppression,
    chunk_size: usize,
}

impl CacheObserver {
    pub fn new(cache: Arc<dyn AsyncCache>) -> Self {
        Self::with_chunk_size(cache, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(cache: Arc<dyn AsyncCache>, chunk_size: usize) -> Self {
        Self {
            cache,
            suppression: PurgeSuppression::new(),
            chunk_size,
        }
    }

    pub fn suppression(&self) -> &PurgeSuppression {
        &self.suppression
    }

    /// Snapshots the keys of an entity about to be updated.
    ///
    /// `original` is the entity as currently persisted. Returns an empty
    /// snapshot while suppressed.
    pub fn updating<E: HasCacheKeys + ?Sized>(&self, original: &E) -> CacheSnapshot {
        if self.suppression.is_suppressed() {
            return CacheSnapshot::default();
        }
        CacheSnapshot {
            keys: original.cache_keys(),
        }
    }

    /// Purges the union of the pre-update snapshot and the saved entity's keys.
    pub async fn saved<E: HasCacheKeys + ?Sized>(
        &self,
        entity: &E,
        snapshot: Option<CacheSnapshot>,
    ) -> bool {
        if self.suppression.is_suppressed() {
            debug!("Cache purge suppressed for saved entity");
            return true;
        }

        let mut keys = snapshot.map(|s| s.keys).unwrap_or_default();
        keys.extend(entity.cache_keys());
        self.purge(keys.into_iter().collect()).await
    }

    /// Purges the deleted entity's keys.
    pub async fn deleted<E: HasCacheKeys + ?Sized>(&self, entity: &E) -> bool {
        if self.suppression.is_suppressed() {
            debug!("Cache purge suppressed for deleted entity");
            return true;
        }

        self.purge(entity.cache_keys().into_iter().collect()).await
    }

    /// Purges keys queued during a committed unit of work.
    ///
    /// Suppression is checked at commit time, not when keys were queued.
    pub async fn commit(&self, pending: PendingPurge) -> bool {
        if self.suppression.is_suppressed() {
            debug!("Cache purge suppressed at commit");
            return true;
        }

        self.purge(pending.keys).await
    }

    async fn purge(&self, keys: Vec<String>) -> bool {
        if keys.is_empty() {
            return true;
        }
        debug!("Purging {} cache keys", keys.len());
        self.cache.delete_multiple_async(&keys, self.chunk_size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{ActiveHours, CacheKeyBuilder, Template, Templates};
    use crate::testing::RecordingAsyncCache;

    #[derive(Clone)]
    struct Post {
        id: u64,
        slug: String,
    }

    impl HasCacheKeys for Post {
        fn cache_keys(&self) -> CacheKeySet {
            [format!("post:{}", self.id), format!("post:slug:{}", self.slug)]
                .into_iter()
                .collect()
        }
    }

    struct Tag;

    impl HasCacheKeys for Tag {}

    fn post(slug: &str) -> Post {
        Post {
            id: 1,
            slug: slug.to_string(),
        }
    }

    fn observer() -> (Arc<RecordingAsyncCache>, CacheObserver) {
        let cache = Arc::new(RecordingAsyncCache::new());
        let observer = CacheObserver::new(cache.clone());
        (cache, observer)
    }

    #[tokio::test]
    async fn test_saved_purges_union_of_old_and_new_keys() {
        let (cache, observer) = observer();
        let original = post("old-title");
        let updated = post("new-title");

        let snapshot = observer.updating(&original);
        assert!(observer.saved(&updated, Some(snapshot)).await);

        cache.assert_key_count(3);
        cache.assert_keys_deleted(&["post:1", "post:slug:old-title", "post:slug:new-title"]);
    }

    #[tokio::test]
    async fn test_saved_without_snapshot_purges_current_keys() {
        let (cache, observer) = observer();

        assert!(observer.saved(&post("fresh"), None).await);

        cache.assert_key_count(2);
        cache.assert_key_deleted("post:slug:fresh");
    }

    #[tokio::test]
    async fn test_deleted_purges_current_keys() {
        let (cache, observer) = observer();

        assert!(observer.deleted(&post("gone")).await);

        cache.assert_called_with(
            &["post:1".to_string(), "post:slug:gone".to_string()],
            DEFAULT_CHUNK_SIZE,
        );
    }

    #[tokio::test]
    async fn test_entity_without_keys_makes_no_call() {
        let (cache, observer) = observer();

        assert!(observer.deleted(&Tag).await);
        assert!(observer.saved(&Tag, None).await);

        assert!(cache.calls().is_empty());
    }

    #[tokio::test]
    async fn test_suppressed_hooks_make_no_calls() {
        let (cache, observer) = observer();
        let entity = post("quiet");

        {
            let _guard = observer.suppression().suppress();
            let snapshot = observer.updating(&entity);
            assert!(snapshot.keys().is_empty());
            observer.saved(&entity, Some(snapshot)).await;
            observer.deleted(&entity).await;
        }
        cache.assert_key_count(0);

        observer.deleted(&entity).await;
        cache.assert_key_count(2);
    }

    #[tokio::test]
    async fn test_nested_suppression_restores_outer_scope() {
        let (cache, observer) = observer();
        let entity = post("nested");

        {
            let _outer = observer.suppression().suppress();
            {
                let _inner = observer.suppression().suppress();
            }
            observer.deleted(&entity).await;
        }
        cache.assert_key_count(0);

        observer.deleted(&entity).await;
        cache.assert_key_count(2);
    }

    #[tokio::test]
    async fn test_commit_purges_pending_keys() {
        let (cache, observer) = observer();
        let templates = Templates::new()
            .with("post", Template::new("post:{id}", 3600))
            .unwrap();
        let builder = CacheKeyBuilder::new(templates, ActiveHours::default());

        let mut pending = PendingPurge::new();
        pending.push(&builder.build("post", [("id", 1)]).unwrap());
        pending.extend(&[builder.build("post", [("id", 2)]).unwrap()]);
        assert_eq!(pending.keys(), &["post:1".to_string(), "post:2".to_string()]);

        assert!(observer.commit(pending).await);
        cache.assert_keys_deleted(&["post:1", "post:2"]);
    }

    #[tokio::test]
    async fn test_commit_checks_suppression_at_commit_time() {
        let (cache, observer) = observer();
        let mut pending = PendingPurge::new();
        pending.keys.push("post:1".to_string());

        let _guard = observer.suppression().suppress();
        observer.commit(pending).await;

        cache.assert_key_count(0);
    }

    #[tokio::test]
    async fn test_dropped_pending_purge_is_discarded() {
        let (cache, _observer) = observer();
        {
            let mut pending = PendingPurge::new();
            pending.keys.push("post:1".to_string());
        }
        assert!(cache.calls().is_empty());
    }

    #[tokio::test]
    async fn test_custom_chunk_size_is_forwarded() {
        let cache = Arc::new(RecordingAsyncCache::new());
        let observer = CacheObserver::with_chunk_size(cache.clone(), 50);

        observer.deleted(&post("chunked")).await;

        assert_eq!(cache.calls()[0].chunk_size, 50);
    }
}
