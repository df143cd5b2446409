//! Recency List Module
//!
//! Slab-backed doubly linked list ordering entries by access time.

use crate::cache::CacheEntry;

// == Recency List ==
/// Orders cache entries from most to least recently used.
///
/// Entries live in a slab of slots so that the value store can hold a plain
/// slot index per key and reach the node in O(1):
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Vacated slots are kept on a free list and reused by later inserts.
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Option<CacheEntry<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a new entry as most recently used and returns its slot.
    pub fn push_front(&mut self, key: K, value: V) -> usize {
        let entry = CacheEntry::new(key, value);
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        self.link_front(slot);
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Marks the entry in `slot` as most recently used.
    ///
    /// The relative order of every other entry is unchanged. Returns false,
    /// leaving the list untouched, if `slot` is vacant or out of range.
    pub fn move_to_front(&mut self, slot: usize) -> bool {
        if self.get(slot).is_none() {
            return false;
        }
        if self.head != Some(slot) {
            self.unlink(slot);
            self.link_front(slot);
        }
        true
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let slot = self.tail?;
        self.unlink(slot);
        let entry = self.slots[slot].take()?;
        self.free.push(slot);
        self.len -= 1;
        Some(entry.into_pair())
    }

    // == Peek Back ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_back(&self) -> Option<(&K, &V)> {
        self.tail
            .and_then(|slot| self.get(slot))
            .map(|entry| (&entry.key, &entry.value))
    }

    // == Slot Access ==
    /// Returns the entry stored in `slot`, if occupied.
    pub fn get(&self, slot: usize) -> Option<&CacheEntry<K, V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Returns the entry stored in `slot` mutably, if occupied.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut CacheEntry<K, V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    #[cfg(test)]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    #[cfg(test)]
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    // == Length ==
    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(entry) = self.slots[slot].as_mut() {
            entry.prev = None;
            entry.next = old_head;
        }

        match old_head {
            Some(head) => {
                if let Some(entry) = self.slots[head].as_mut() {
                    entry.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }

        self.head = Some(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = match self.slots[slot].as_mut() {
            Some(entry) => (entry.prev.take(), entry.next.take()),
            None => return,
        };

        match prev {
            Some(prev) => {
                if let Some(entry) = self.slots[prev].as_mut() {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next) => {
                if let Some(entry) = self.slots[next].as_mut() {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Iterator over `(key, value)` pairs in recency order, most recent first.
pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.get(self.cursor?)?;
        self.cursor = entry.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<&'static str, u32>) -> Vec<&'static str> {
        list.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<&str, u32> = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = RecencyList::new();

        list.push_front("key1", 1);
        list.push_front("key2", 2);
        list.push_front("key3", 3);

        assert_eq!(list.len(), 3);
        assert_eq!(keys(&list), vec!["key3", "key2", "key1"]);
        // key1 is oldest (added first)
        assert_eq!(list.peek_back(), Some((&"key1", &1)));
    }

    #[test]
    fn test_move_to_front() {
        let mut list = RecencyList::new();

        let a = list.push_front("a", 1);
        list.push_front("b", 2);
        list.push_front("c", 3);

        list.move_to_front(a);

        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert_eq!(list.peek_back(), Some((&"b", &2)));
    }

    #[test]
    fn test_move_middle_to_front() {
        let mut list = RecencyList::new();

        list.push_front("a", 1);
        let b = list.push_front("b", 2);
        list.push_front("c", 3);

        list.move_to_front(b);

        assert_eq!(keys(&list), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_head_is_noop() {
        let mut list = RecencyList::new();

        list.push_front("a", 1);
        let b = list.push_front("b", 2);

        list.move_to_front(b);
        list.move_to_front(b);

        assert_eq!(keys(&list), vec!["b", "a"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_pop_back() {
        let mut list = RecencyList::new();

        list.push_front("key1", 1);
        list.push_front("key2", 2);
        list.push_front("key3", 3);

        assert_eq!(list.pop_back(), Some(("key1", 1)));
        assert_eq!(list.len(), 2);

        assert_eq!(list.pop_back(), Some(("key2", 2)));
        assert_eq!(list.pop_back(), Some(("key3", 3)));
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn test_pop_back_empty() {
        let mut list: RecencyList<&str, u32> = RecencyList::new();
        assert_eq!(list.pop_back(), None);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut list = RecencyList::with_capacity(2);

        let first = list.push_front("a", 1);
        list.push_front("b", 2);
        list.pop_back();

        let reused = list.push_front("c", 3);

        assert_eq!(reused, first);
        assert_eq!(keys(&list), vec!["c", "b"]);
        assert_eq!(list.get(reused).map(|e| e.value), Some(3));
    }

    #[test]
    fn test_order_after_multiple_moves() {
        let mut list = RecencyList::new();

        let a = list.push_front("a", 1);
        let b = list.push_front("b", 2);
        let c = list.push_front("c", 3);

        list.move_to_front(a);
        list.move_to_front(c);
        list.move_to_front(b);

        // front=[b, c, a]=back
        assert_eq!(list.pop_back(), Some(("a", 1)));
        assert_eq!(list.pop_back(), Some(("c", 3)));
        assert_eq!(list.pop_back(), Some(("b", 2)));
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut list = RecencyList::new();
        let slot = list.push_front("a", 1);

        if let Some(entry) = list.get_mut(slot) {
            entry.value = 10;
        }

        assert_eq!(list.peek_back(), Some((&"a", &10)));
        assert!(list.get(slot + 1).is_none());
    }

    #[test]
    fn test_move_vacant_slot_is_rejected() {
        let mut list = RecencyList::new();

        let a = list.push_front("a", 1);
        list.push_front("b", 2);
        list.pop_back();

        assert!(!list.move_to_front(a));
        assert_eq!(keys(&list), vec!["b"]);

        // the freed slot is reused without forming a cycle
        list.push_front("c", 3);
        assert_eq!(list.iter().take(5).count(), 2);
        assert_eq!(keys(&list), vec!["c", "b"]);
        assert_eq!(list.peek_back(), Some((&"b", &2)));
    }

    #[test]
    fn test_move_out_of_range_slot_is_rejected() {
        let mut list = RecencyList::new();
        list.push_front("a", 1);

        assert!(!list.move_to_front(99));
        assert_eq!(keys(&list), vec!["a"]);
        assert_eq!(list.head(), list.tail());
    }

    #[test]
    fn test_iter_exact_size() {
        let mut list = RecencyList::new();
        list.push_front("a", 1);
        list.push_front("b", 2);

        let iter = list.iter();
        assert_eq!(iter.len(), 2);
    }
}
