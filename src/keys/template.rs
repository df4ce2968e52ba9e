//! Template Module
//!
//! Defines key templates and the TTL specs attached to them.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Matches any non-empty `{...}` span in a pattern or key.
pub(crate) static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("placeholder regex is valid"));

// == Ttl ==
/// Lifetime of a cache entry, relative to now or fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ttl {
    /// Expires this many seconds after the key is built
    Seconds(u64),
    /// Expires at a fixed instant
    At(DateTime<Utc>),
}

impl Ttl {
    /// Converts the TTL to an absolute expiry.
    ///
    /// Relative TTLs saturate at the latest representable instant.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Ttl::Seconds(secs) => i64::try_from(*secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .and_then(|delta| now.checked_add_signed(delta))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            Ttl::At(at) => *at,
        }
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Ttl::Seconds(secs)
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::Seconds(duration.as_secs())
    }
}

impl From<DateTime<Utc>> for Ttl {
    fn from(at: DateTime<Utc>) -> Self {
        Ttl::At(at)
    }
}

// == Template ==
/// A named key pattern with its active-hours and after-hours TTLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Key pattern with `{name}` placeholders
    pub pattern: String,
    /// TTL used inside the active window (or always, without an after-hours TTL)
    #[serde(alias = "in_working_hours_ttl")]
    pub in_window_ttl: Ttl,
    /// TTL used outside the active window
    #[serde(default, alias = "after_working_hours_ttl")]
    pub after_window_ttl: Option<Ttl>,
}

impl Template {
    /// Creates a template with a single TTL.
    pub fn new(pattern: impl Into<String>, ttl: impl Into<Ttl>) -> Self {
        Self {
            pattern: pattern.into(),
            in_window_ttl: ttl.into(),
            after_window_ttl: None,
        }
    }

    /// Sets the TTL used outside the active window.
    pub fn after_hours(mut self, ttl: impl Into<Ttl>) -> Self {
        self.after_window_ttl = Some(ttl.into());
        self
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER
            .captures_iter(&self.pattern)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Checks that the pattern is non-empty and its placeholder names are unique.
    pub fn validate(&self) -> Result<()> {
        if self.pattern.is_empty() {
            return Err(CacheError::InvalidTemplate(
                "pattern cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in self.placeholders() {
            if !seen.insert(name) {
                return Err(CacheError::InvalidTemplate(format!(
                    "placeholder '{{{}}}' appears more than once in '{}'",
                    name, self.pattern
                )));
            }
        }

        Ok(())
    }
}
