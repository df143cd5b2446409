//! Eviction Observer Module
//!
//! Registry of callbacks notified whenever an entry is evicted.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::error;

// == Subscription Id ==
/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric id, unique within one registry.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

type Callback<K, V> = Arc<dyn Fn(&K, &V) + Send + Sync>;

// == Eviction Observers ==
/// Ordered list of eviction callbacks.
///
/// Observers are invoked in registration order with the evicted key and
/// value. Cloning the registry is cheap: callbacks are shared.
pub struct EvictionObservers<K, V> {
    observers: Vec<(SubscriptionId, Callback<K, V>)>,
    next_id: u64,
}

impl<K, V> EvictionObservers<K, V> {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    // == Subscribe ==
    /// Registers `callback` and returns its subscription id.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&K, &V) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Arc::new(callback)));
        id
    }

    // == Unsubscribe ==
    /// Removes the observer registered under `id`.
    ///
    /// Returns false if no such observer is registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.observers.iter().position(|(existing, _)| *existing == id) {
            Some(index) => {
                // keep registration order for the remaining observers
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    // == Notify ==
    /// Delivers an eviction to every observer, in registration order.
    ///
    /// A panicking observer is logged and skipped; the others still run.
    pub fn notify(&self, key: &K, value: &V) {
        for (id, callback) in &self.observers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(key, value)));
            if let Err(payload) = outcome {
                error!(
                    subscription = id.0,
                    reason = panic_message(payload.as_ref()),
                    "eviction observer panicked"
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

impl<K, V> Default for EvictionObservers<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for EvictionObservers<K, V> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
            next_id: self.next_id,
        }
    }
}

impl<K, V> fmt::Debug for EvictionObservers<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvictionObservers")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
