//! Recency List Module
//!
//! Doubly linked list of entries ordered from most to least recently used.
//!
//! Nodes live in a slot arena and link to each other by slot index, so the
//! list never holds references into itself. Vacated slots go on a free list
//! and are handed out again by the next insertion.

use crate::cache::Entry;

// == Recency List ==
/// Slot arena holding the entries in recency order.
///
/// - Head = Most recently used
/// - Tail = Least recently used
#[derive(Debug)]
pub struct RecencyList<T> {
    /// Node storage, `None` marks a free slot
    slots: Vec<Option<Entry<T>>>,
    /// Free slot indices available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Number of linked nodes
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Accessors ==
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot of the most recently used node.
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Slot of the least recently used node.
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    pub fn get(&self, idx: usize) -> Option<&Entry<T>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, idx: usize) -> Option<&mut Entry<T>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    // == Push Front ==
    /// Stores a node and links it at the head. Returns its slot.
    ///
    /// On an empty list the node becomes both head and tail.
    pub fn push_front(&mut self, mut entry: Entry<T>) -> usize {
        entry.prev = None;
        entry.next = None;

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        self.link_front(idx);
        idx
    }

    // == Pop Back ==
    /// Removes the least recently used node, or returns None on an empty list.
    pub fn pop_back(&mut self) -> Option<Entry<T>> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Remove ==
    /// Unlinks the node at `idx` and releases its slot.
    ///
    /// A node that is stored but already detached is released as well.
    pub fn remove(&mut self, idx: usize) -> Option<Entry<T>> {
        self.get(idx)?;
        self.unlink(idx);

        let entry = self.slots.get_mut(idx).and_then(Option::take);
        if entry.is_some() {
            self.free.push(idx);
        }
        entry
    }

    // == Move To Front ==
    /// Promotes the node at `idx` to most recently used.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        if self.unlink(idx) {
            self.link_front(idx);
        }
    }

    // == Unlink ==
    /// Detaches the node at `idx` from its neighbours without freeing its slot.
    ///
    /// Patches both neighbours, moves head/tail when the node was an endpoint
    /// and clears the node's own links. Returns false if `idx` is not linked.
    fn unlink(&mut self, idx: usize) -> bool {
        let (prev, next) = match self.get(idx) {
            Some(node) => (node.prev, node.next),
            None => return false,
        };

        // Only the head has no predecessor
        if prev.is_none() && self.head != Some(idx) {
            return false;
        }

        match prev {
            Some(p) => {
                if let Some(node) = self.get_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(n) => {
                if let Some(node) = self.get_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.get_mut(idx) {
            node.prev = None;
            node.next = None;
        }

        self.len -= 1;
        true
    }

    // == Clear ==
    /// Drops every node and resets the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iteration ==
    /// Walks the list from head (most recent) to tail (least recent).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    // == Consistency Check ==
    /// Verifies that the list is acyclic and that the forward and backward
    /// walks visit the same nodes in reverse order.
    pub fn is_consistent(&self) -> bool {
        let mut forward = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        let mut prev = None;

        while let Some(idx) = cursor {
            // More hops than linked nodes means a cycle
            if forward.len() == self.len {
                return false;
            }
            let Some(node) = self.get(idx) else {
                return false;
            };
            if node.prev != prev {
                return false;
            }
            forward.push(idx);
            prev = Some(idx);
            cursor = node.next;
        }

        if forward.len() != self.len || self.tail != prev {
            return false;
        }

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        occupied == self.len && occupied + self.free.len() == self.slots.len()
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;

        if let Some(node) = self.get_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(h) => {
                if let Some(node) = self.get_mut(h) {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
        self.len += 1;
    }
}

// == Iterator ==
/// Head-to-tail iterator yielding `(slot, entry)` pairs.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a Entry<T>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.cursor?;
        let node = self.list.get(idx)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some((idx, node))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> Entry<u32> {
        Entry::new(key.to_string(), 0, 0, 1_000)
    }

    fn keys(list: &RecencyList<u32>) -> Vec<String> {
        list.iter().map(|(_, e)| e.key.clone()).collect()
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<u32> = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert!(list.is_consistent());
    }

    #[test]
    fn test_push_front_single_is_head_and_tail() {
        let mut list = RecencyList::new();
        let idx = list.push_front(entry("a"));

        assert_eq!(list.head(), Some(idx));
        assert_eq!(list.tail(), Some(idx));
        assert_eq!(list.len(), 1);
        assert!(list.is_consistent());
    }

    #[test]
    fn test_push_front_orders_most_recent_first() {
        let mut list = RecencyList::new();
        list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.push_front(entry("c"));

        assert_eq!(keys(&list), vec!["c", "b", "a"]);
        assert!(list.is_consistent());
    }

    #[test]
    fn test_pop_back_returns_oldest() {
        let mut list = RecencyList::new();
        list.push_front(entry("a"));
        list.push_front(entry("b"));

        let popped = list.pop_back().unwrap();
        assert_eq!(popped.key, "a");
        assert!(popped.is_detached());
        assert_eq!(keys(&list), vec!["b"]);

        let popped = list.pop_back().unwrap();
        assert_eq!(popped.key, "b");
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert!(list.is_consistent());
    }

    #[test]
    fn test_pop_back_empty() {
        let mut list: RecencyList<u32> = RecencyList::new();
        assert!(list.pop_back().is_none());
        assert!(list.pop_back().is_none());
        assert!(list.is_consistent());
    }

    #[test]
    fn test_remove_middle_patches_neighbours() {
        let mut list = RecencyList::new();
        list.push_front(entry("a"));
        let b = list.push_front(entry("b"));
        list.push_front(entry("c"));

        let removed = list.remove(b).unwrap();
        assert_eq!(removed.key, "b");
        assert_eq!(keys(&list), vec!["c", "a"]);
        assert!(list.is_consistent());
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut list = RecencyList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));
        let c = list.push_front(entry("c"));

        list.remove(c);
        assert_eq!(keys(&list), vec!["b", "a"]);
        list.remove(a);
        assert_eq!(keys(&list), vec!["b"]);
        assert_eq!(list.head(), list.tail());
        assert!(list.is_consistent());
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut list = RecencyList::new();
        let a = list.push_front(entry("a"));

        assert!(list.remove(a).is_some());
        assert!(list.remove(a).is_none());
        assert!(list.remove(42).is_none());
        assert!(list.is_consistent());
    }

    #[test]
    fn test_free_slots_are_reused() {
        let mut list = RecencyList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));

        list.remove(a);
        let c = list.push_front(entry("c"));

        assert_eq!(c, a);
        assert_eq!(keys(&list), vec!["c", "b"]);
        assert!(list.is_consistent());
    }

    #[test]
    fn test_move_to_front() {
        let mut list = RecencyList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));
        list.push_front(entry("c"));

        list.move_to_front(a);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert!(list.is_consistent());

        // Already at head
        list.move_to_front(a);
        assert_eq!(keys(&list), vec!["a", "c", "b"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_unlink_clears_own_links() {
        let mut list = RecencyList::new();
        list.push_front(entry("a"));
        let b = list.push_front(entry("b"));
        list.push_front(entry("c"));

        assert!(list.unlink(b));
        assert!(list.get(b).unwrap().is_detached());
        assert!(!list.unlink(b));
        assert_eq!(keys(&list), vec!["c", "a"]);
    }

    #[test]
    fn test_remove_after_unlink_releases_slot() {
        let mut list = RecencyList::new();
        let a = list.push_front(entry("a"));
        list.push_front(entry("b"));

        assert!(list.unlink(a));
        let removed = list.remove(a).unwrap();
        assert_eq!(removed.key, "a");
        assert_eq!(list.len(), 1);
        assert!(list.is_consistent());

        // Slot goes back on the free list
        let c = list.push_front(entry("c"));
        assert_eq!(c, a);
        assert_eq!(keys(&list), vec!["c", "b"]);
        assert!(list.is_consistent());
    }

    #[test]
    fn test_clear() {
        let mut list = RecencyList::new();
        list.push_front(entry("a"));
        list.push_front(entry("b"));

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
        assert!(list.is_consistent());
    }
}
