//! Cache Module
//!
//! Provides a bounded in-memory cache with O(1) LRU eviction and
//! eviction observers.

mod entry;
mod lru;
mod observer;
mod shared;
mod stats;
mod store;


pub(crate) use entry::CacheEntry;
pub(crate) use lru::RecencyList;

// Re-export public types
pub use observer::{EvictionObservers, SubscriptionId};
pub use shared::SharedLruCache;
pub use stats::CacheStats;
pub use store::LruCache;
