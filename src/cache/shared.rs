//! Shared Cache Module
//!
//! Thread-safe wrapper guarding the whole engine with one lock.

use std::borrow::Borrow;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::cache::{CacheStats, LruCache, SubscriptionId};
use crate::error::Result;

// == Shared LRU Cache ==
/// An [`LruCache`] that can be shared between threads, e.g. via `Arc`.
///
/// The map and the recency list sit behind a single mutex held for the full
/// body of every operation, so callers always observe them consistently.
/// `get` takes the same exclusive lock as `set` because it reorders entries.
///
/// Eviction observers run after the cache lock is released but before `set`
/// returns, on the calling thread. They may therefore call back into the
/// cache, and evictions caused by one thread are reported in the order that
/// thread caused them. The observer list is the engine's own, shared by
/// reference count and only copied when it changes.
pub struct SharedLruCache<K, V> {
    inner: Mutex<LruCache<K, V>>,
    capacity: usize,
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty shared cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self::from_engine(LruCache::new(capacity)?))
    }

    /// Creates a shared cache from a signed capacity, rejecting `capacity <= 0`.
    pub fn with_signed_capacity(capacity: i64) -> Result<Self> {
        Ok(Self::from_engine(LruCache::with_signed_capacity(capacity)?))
    }

    fn from_engine(engine: LruCache<K, V>) -> Self {
        Self {
            capacity: engine.capacity(),
            inner: Mutex::new(engine),
        }
    }

    // == Get ==
    /// Retrieves a copy of the value and marks the key most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    // == Set ==
    /// Stores a key-value pair, evicting the least recently used entry if a
    /// new key arrives while the cache is full.
    pub fn set(&self, key: K, value: V) {
        let mut cache = self.inner.lock();
        let evicted = cache
            .set_without_notify(key, value)
            .map(|entry| (entry, cache.observers()));
        drop(cache);

        // Lock released: observers may call back into the cache
        if let Some(((evicted_key, evicted_value), observers)) = evicted {
            observers.notify(&evicted_key, &evicted_value);
        }
    }

    // == Read-only Access ==
    /// Retrieves a copy of the value without changing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    /// Snapshot of the keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    // == Observers ==
    /// Registers a callback invoked with every evicted key and value.
    pub fn on_eviction<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&K, &V) + Send + Sync + 'static,
    {
        self.inner.lock().on_eviction(callback)
    }

    /// Unregisters an eviction callback. Returns false if it was not registered.
    pub fn remove_eviction_observer(&self, id: SubscriptionId) -> bool {
        self.inner.lock().remove_eviction_observer(id)
    }
}
