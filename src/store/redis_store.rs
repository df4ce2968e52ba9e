//! Redis Store Module
//!
//! [`CacheRepository`] over Redis, exposing `UNLINK` as the bulk-unlink fast path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use crate::error::Result;
use crate::store::{BulkUnlink, CacheRepository};

// == Redis Store ==
/// Redis-backed cache store.
///
/// Every key is sent with the configured prefix, so callers work with the
/// same unprefixed keys they build from templates.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisStore {
    /// Connects to `redis_url` with an auto-reconnecting connection manager.
    pub async fn connect(redis_url: &str, prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn prefixed(&self, key: &str) -> String {
        apply_prefix(&self.prefix, key)
    }

    fn prefixed_all(&self, keys: &[String]) -> Vec<String> {
        keys.iter().map(|key| self.prefixed(key)).collect()
    }
}

fn apply_prefix(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key)
}

/// Milliseconds until `expires_at`, or `None` if it has already passed.
fn millis_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<u64> {
    let millis = (expires_at - now).num_milliseconds();
    u64::try_from(millis).ok().filter(|millis| *millis > 0)
}

#[async_trait]
impl CacheRepository for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.prefixed(key)).await?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn put(&self, key: &str, value: String, expires_at: DateTime<Utc>) -> Result<()> {
        let Some(ttl_ms) = millis_until(expires_at, Utc::now()) else {
            self.forget(key).await?;
            return Ok(());
        };

        let mut conn = self.conn.clone();
        conn.pset_ex::<_, _, ()>(self.prefixed(key), value, ttl_ms)
            .await?;

        debug!("Cached key '{}' with TTL {}ms", key, ttl_ms);
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(self.prefixed(key)).await?;
        Ok(exists)
    }

    async fn forget(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let deleted: i64 = conn.del(self.prefixed(key)).await?;
        debug!("Forgot key '{}' (existed: {})", key, deleted > 0);
        Ok(true)
    }

    async fn delete_multiple(&self, keys: &[String]) -> Result<bool> {
        if keys.is_empty() {
            return Ok(true);
        }

        let mut conn = self.conn.clone();
        let deleted: i64 = conn.del(self.prefixed_all(keys)).await?;
        debug!("Deleted {} of {} keys", deleted, keys.len());
        Ok(true)
    }

    fn bulk_unlink(&self) -> Option<&dyn BulkUnlink> {
        Some(self)
    }
}

#[async_trait]
impl BulkUnlink for RedisStore {
    async fn unlink(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.clone();
        let unlinked: u64 = conn.unlink(self.prefixed_all(keys)).await?;
        debug!("Unlinked {} of {} keys", unlinked, keys.len());
        Ok(unlinked)
    }
}
