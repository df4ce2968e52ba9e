//! Store Entry Module
//!
//! Defines the structure for individual in-memory entries with an absolute expiry.

use chrono::{DateTime, Utc};

// == Store Entry ==
/// Represents a single stored value and its expiry.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: String,
    /// When the entry stops being readable
    pub expires_at: DateTime<Utc>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry expiring at `expires_at`.
    pub fn new(value: String, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry is expired once `now` reaches the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks if the entry has expired as of the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
