//! Mini LRU - A bounded in-memory cache engine
//!
//! Provides O(1) get/set with least-recently-used eviction and synchronous
//! eviction observers, in a single-owner flavour ([`LruCache`]) and a
//! thread-safe one ([`SharedLruCache`]).

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, LruCache, SharedLruCache, SubscriptionId};
pub use config::Config;
pub use error::{CacheError, Result};
