//! Error types for cache key building and invalidation
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Requested template name is absent from the registry
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// Substitution left unresolved placeholders
    #[error("Missing parameters for cache key template '{template}'. Key: {key}")]
    MissingParameter {
        /// Name of the template being built
        template: String,
        /// Partially substituted key
        key: String,
    },

    /// Template violates its invariants
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backing store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Value or registry (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Scaffold target already exists
    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Scaffold name is empty or not a valid identifier
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Store(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
