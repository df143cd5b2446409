//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
///
/// Lookups and inserts never fail; only building a cache (or the
/// configuration it is built from) can.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity or another configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl CacheError {
    /// Shorthand for the capacity rejection message.
    pub(crate) fn non_positive_capacity(capacity: i64) -> Self {
        CacheError::InvalidConfiguration(format!(
            "capacity must be greater than 0, got {}",
            capacity
        ))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
