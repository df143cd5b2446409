//! Cache Entry Module
//!
//! Defines the node stored once per live key.

// == Cache Entry ==
/// A single cached key-value pair together with its position in the
/// recency list.
///
/// `prev` points towards the most recently used end, `next` towards the
/// least recently used end. Both are slot indices into the owning
/// `RecencyList`.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<K, V> {
    /// The cached key
    pub key: K,
    /// The stored value
    pub value: V,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a detached entry (no neighbours).
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    // == Replace Value ==
    /// Overwrites the stored value, returning the previous one.
    pub fn replace_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }

    /// Consumes the entry, yielding its key and value.
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }

    #[cfg(test)]
    fn is_detached(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}
