//! Cache Key Builder Module
//!
//! Resolves a template and its parameters into a concrete [`CacheKey`].

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::keys::template::PLACEHOLDER;
use crate::keys::{resolve_ttl, ActiveHours, CacheKey, TemplateRegistry};

/// Empty parameter list for templates without placeholders.
pub const NO_PARAMS: [(&str, &str); 0] = [];

// == Cache Key Builder ==
/// Builds cache keys from a registry and an active-hours window.
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder<R> {
    registry: R,
    window: ActiveHours,
}

impl<R: TemplateRegistry> CacheKeyBuilder<R> {
    pub fn new(registry: R, window: ActiveHours) -> Self {
        Self { registry, window }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn window(&self) -> ActiveHours {
        self.window
    }

    /// Builds a key for `template` using the local clock.
    ///
    /// # Errors
    /// - `TemplateNotFound` if the registry has no such template
    /// - `MissingParameter` if a placeholder is left unresolved
    pub fn build<I, K, V>(&self, template: &str, params: I) -> Result<CacheKey>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        self.build_at(template, params, &Local::now())
    }

    /// Builds a key for `template` as of `now`.
    pub fn build_at<I, K, V, Tz>(
        &self,
        template: &str,
        params: I,
        now: &DateTime<Tz>,
    ) -> Result<CacheKey>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
        Tz: TimeZone,
    {
        let found = self.registry.template(template)?;
        let key = substitute(&found.pattern, params);

        if PLACEHOLDER.is_match(&key) {
            return Err(CacheError::MissingParameter {
                template: template.to_string(),
                key,
            });
        }

        let expiry = resolve_ttl(
            &found.in_window_ttl,
            found.after_window_ttl.as_ref(),
            now,
            &self.window,
        );

        debug!("Built cache key '{}' expiring at {}", key, expiry);
        Ok(CacheKey::new(key, expiry))
    }
}

/// Replaces every exact `{name}` token with its value.
fn substitute<I, K, V>(pattern: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    params
        .into_iter()
        .fold(pattern.to_string(), |key, (name, value)| {
            let token = format!("{{{}}}", name.as_ref());
            key.replace(&token, &value.to_string())
        })
}
