//! Cache Key Module
//!
//! A fully substituted key with its expiry, plus typed store helpers.

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::store::CacheRepository;

// == Cache Key ==
/// Concrete key and the instant it should expire.
///
/// Values are stored as JSON so any serde type can be cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: String,
    expiry: DateTime<Utc>,
}

impl CacheKey {
    pub(crate) fn new(key: String, expiry: DateTime<Utc>) -> Self {
        Self { key, expiry }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    pub fn into_key(self) -> String {
        self.key
    }

    // == Store Helpers ==
    /// Returns the cached value, or computes, stores and returns it.
    pub async fn remember<T, F, Fut>(&self, store: &dyn CacheRepository, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if let Some(value) = self.get(store).await? {
            return Ok(value);
        }

        let value = compute().await;
        self.put(store, &value).await?;
        Ok(value)
    }

    /// Stores `value` until this key's expiry.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        store: &dyn CacheRepository,
        value: &T,
    ) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        store.put(&self.key, encoded, self.expiry).await
    }

    /// Reads and decodes the cached value, if any.
    pub async fn get<T: DeserializeOwned>(&self, store: &dyn CacheRepository) -> Result<Option<T>> {
        match store.get(&self.key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Returns true if a live value is cached under this key.
    pub async fn cached(&self, store: &dyn CacheRepository) -> Result<bool> {
        store.has(&self.key).await
    }

    /// Removes the cached value.
    pub async fn forget(&self, store: &dyn CacheRepository) -> Result<bool> {
        store.forget(&self.key).await
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.key
    }
}
