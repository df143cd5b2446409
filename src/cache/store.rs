//! Cache Store Module
//!
//! Main cache engine combining hash map lookup with recency ordering.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::cache::{CacheStats, EvictionObservers, RecencyList, SubscriptionId};
use crate::error::{CacheError, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand.
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

// == LRU Cache ==
/// Bounded key-value cache evicting the least recently used entry.
///
/// Every stored key maps to exactly one node in the recency list, so `get`,
/// `set` and eviction are all O(1). `get` promotes the key it finds and
/// therefore needs `&mut self`.
///
/// # Example
/// ```
/// use mini_lru::LruCache;
///
/// let mut cache = LruCache::new(2).unwrap();
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.get("a");
/// cache.set("c", 3); // evicts "b"
///
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.get("a"), Some(&1));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Key to recency-list slot
    entries: HashMap<K, usize, RandomState>,
    /// Entries ordered most to least recently used
    recency: RecencyList<K, V>,
    /// Callbacks fired after each eviction, copied on write
    observers: Arc<EvictionObservers<K, V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfiguration`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::non_positive_capacity(0));
        }

        let reserved = capacity.min(MAX_PREALLOCATED_ENTRIES);
        debug!(capacity, "LRU cache created");

        Ok(Self {
            entries: HashMap::with_capacity_and_hasher(reserved, RandomState::new()),
            recency: RecencyList::with_capacity(reserved),
            observers: Arc::new(EvictionObservers::new()),
            stats: CacheStats::new(capacity),
            capacity,
        })
    }

    /// Creates a cache from a signed capacity, rejecting `capacity <= 0`.
    pub fn with_signed_capacity(capacity: i64) -> Result<Self> {
        let capacity = usize::try_from(capacity)
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| CacheError::non_positive_capacity(capacity))?;
        Self::new(capacity)
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// A miss returns None and leaves the recency order untouched.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&slot) = self.entries.get(key) else {
            self.stats.record_miss();
            trace!("cache miss");
            return None;
        };

        self.stats.record_hit();
        self.recency.move_to_front(slot);
        self.recency.get(slot).map(|entry| &entry.value)
    }

    // == Set ==
    /// Stores a key-value pair and marks it most recently used.
    ///
    /// If the key already exists its value is overwritten and nothing is
    /// evicted. If the key is new and the cache is full, the least recently
    /// used entry is evicted first and the eviction observers are notified
    /// with it once the cache is consistent again.
    pub fn set(&mut self, key: K, value: V) {
        if let Some((evicted_key, evicted_value)) = self.set_without_notify(key, value) {
            self.observers.notify(&evicted_key, &evicted_value);
        }
    }

    /// Performs `set` and hands back the evicted entry instead of notifying.
    pub(crate) fn set_without_notify(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&slot) = self.entries.get(&key) {
            if let Some(entry) = self.recency.get_mut(slot) {
                entry.replace_value(value);
            }
            self.recency.move_to_front(slot);
            self.stats.record_update();
            return None;
        }

        // Evict before inserting so the size never exceeds capacity
        let evicted = if self.entries.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let slot = self.recency.push_front(key.clone(), value);
        self.entries.insert(key, slot);
        self.stats.record_insert();

        evicted
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.recency.pop_back()?;
        self.entries.remove(&key);
        self.stats.record_eviction();
        debug!(
            remaining = self.entries.len(),
            capacity = self.capacity,
            "evicted least recently used entry"
        );
        Some((key, value))
    }

    // == Peek ==
    /// Retrieves a value without changing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.entries.get(key)?;
        self.recency.get(slot).map(|entry| &entry.value)
    }

    /// Returns true if `key` is cached. Does not promote it.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Returns the next eviction candidate without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.recency.peek_back()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.recency.iter().map(|(key, _)| key)
    }

    /// Key-value pairs from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.recency.iter()
    }

    // == Observers ==
    /// Registers a callback invoked with every evicted key and value.
    pub fn on_eviction<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&K, &V) + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.observers).subscribe(callback)
    }

    /// Unregisters an eviction callback. Returns false if it was not registered.
    pub fn remove_eviction_observer(&mut self, id: SubscriptionId) -> bool {
        Arc::make_mut(&mut self.observers).unsubscribe(id)
    }

    /// Shares the current observer list without copying it.
    pub(crate) fn observers(&self) -> Arc<EvictionObservers<K, V>> {
        Arc::clone(&self.observers)
    }

    // == Stats ==
    /// Returns current cache statistics.
    ///
    /// The entry count is taken from the map at call time.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Walks both structures and reports the first inconsistency found.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        if self.entries.len() > self.capacity {
            return Err(format!(
                "{} entries exceed capacity {}",
                self.entries.len(),
                self.capacity
            ));
        }
        if self.entries.len() != self.recency.len() {
            return Err(format!(
                "map holds {} keys but recency list holds {}",
                self.entries.len(),
                self.recency.len()
            ));
        }

        let mut cursor = self.recency.head();
        let mut prev = None;
        let mut walked = 0;
        while let Some(slot) = cursor {
            let entry = self
                .recency
                .get(slot)
                .ok_or_else(|| format!("linked slot {} is vacant", slot))?;
            if entry.prev != prev {
                return Err(format!("slot {} has a broken back link", slot));
            }
            if self.entries.get(&entry.key) != Some(&slot) {
                return Err(format!("slot {} is not indexed by its key", slot));
            }
            walked += 1;
            if walked > self.entries.len() {
                return Err("recency list contains a cycle".to_string());
            }
            prev = Some(slot);
            cursor = entry.next;
        }

        if walked != self.entries.len() {
            return Err(format!(
                "walked {} nodes, expected {}",
                walked,
                self.entries.len()
            ));
        }
        if self.recency.tail() != prev {
            return Err("tail does not match last linked node".to_string());
        }
        Ok(())
    }
}
