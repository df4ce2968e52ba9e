//! Keys Module
//!
//! Template registries, cache key construction and active-hours TTL selection.

mod builder;
mod cache_key;
mod registry;
mod template;
mod window;


// Re-export public types
pub use builder::{CacheKeyBuilder, NO_PARAMS};
pub use cache_key::CacheKey;
pub use registry::{TemplateRegistry, Templates};
pub use template::{Template, Ttl};
pub use window::{resolve_ttl, ActiveHours};
