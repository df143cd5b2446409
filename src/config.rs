//! Configuration Module
//!
//! Handles loading the workload driver's configuration from environment
//! variables.

use std::env;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Workload configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Number of concurrent tasks driving the cache
    pub workers: usize,
    /// Operations issued by each worker
    pub ops_per_worker: u64,
    /// Number of distinct keys the workers draw from
    pub key_space: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000), must be > 0
    /// - `WORKERS` - Concurrent worker tasks (default: 4)
    /// - `OPS_PER_WORKER` - Operations per worker (default: 10000)
    /// - `KEY_SPACE` - Distinct keys in the workload (default: 2000)
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfiguration`] if `CACHE_CAPACITY` is
    /// not a positive integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let capacity = match lookup("CACHE_CAPACITY") {
            Some(raw) => parse_capacity(&raw)?,
            None => defaults.capacity,
        };

        Ok(Self {
            capacity,
            workers: parse_or(lookup("WORKERS"), defaults.workers).max(1),
            ops_per_worker: parse_or(lookup("OPS_PER_WORKER"), defaults.ops_per_worker),
            key_space: parse_or(lookup("KEY_SPACE"), defaults.key_space).max(1),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            workers: 4,
            ops_per_worker: 10_000,
            key_space: 2000,
        }
    }
}

/// Parses a capacity, rejecting anything that is not a positive integer.
pub fn parse_capacity(raw: &str) -> Result<usize> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        CacheError::InvalidConfiguration(format!("CACHE_CAPACITY is not an integer: {:?}", raw))
    })?;

    usize::try_from(value)
        .ok()
        .filter(|c| *c > 0)
        .ok_or_else(|| CacheError::non_positive_capacity(value))
}

fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
