//! Recency List Module
//!
//! Doubly-linked list of cache entries ordered by recency, stored in an arena
//! of slots addressed by stable indices.

use crate::cache::Entry;
use crate::error::{CacheError, Result};

// == Node Reference ==
/// Stable position of an entry in the recency list.
///
/// A reference stays valid while its entry is in the list, no matter how
/// often the entry is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(usize);

#[derive(Debug)]
struct Node<V> {
    entry: Entry<V>,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
enum Slot<V> {
    Occupied(Node<V>),
    Vacant { next_free: Option<usize> },
}

// == Recency List ==
/// Orders entries by last touch.
///
/// - Front (head) = most recently used
/// - Back (tail) = least recently used
///
/// Every operation is O(1). Removed slots go onto a free list and are
/// reused by later inserts.
#[derive(Debug)]
pub struct RecencyList<V> {
    slots: Vec<Slot<V>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Option<usize>,
    len: usize,
}

impl<V> Default for RecencyList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecencyList<V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            free: None,
            len: 0,
        }
    }

    // == Insert Front ==
    /// Adds a new entry at the most-recent position.
    ///
    /// The caller guarantees `key` is not already in the list.
    pub fn insert_front(&mut self, key: String, value: V) -> NodeRef {
        let node = Node {
            entry: Entry { key, value },
            prev: None,
            next: None,
        };

        let idx = match self.free {
            Some(idx) => {
                if let Slot::Vacant { next_free } = self.slots[idx] {
                    self.free = next_free;
                }
                self.slots[idx] = Slot::Occupied(node);
                idx
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        };

        self.link_front(idx);
        self.len += 1;
        NodeRef(idx)
    }

    // == Move To Front ==
    /// Marks an entry as most recently used without touching its value.
    pub fn move_to_front(&mut self, node: NodeRef) {
        if self.head == Some(node.0) {
            return;
        }
        self.unlink(node.0);
        self.link_front(node.0);
    }

    // == Remove ==
    /// Detaches the entry at `node` and returns its key and value.
    ///
    /// # Panics
    /// Panics if `node` does not refer to a live entry.
    pub fn remove(&mut self, node: NodeRef) -> (String, V) {
        self.unlink(node.0);
        let slot = std::mem::replace(
            &mut self.slots[node.0],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        self.free = Some(node.0);
        self.len -= 1;

        match slot {
            Slot::Occupied(node) => (node.entry.key, node.entry.value),
            Slot::Vacant { .. } => panic!("stale node reference {:?}", node),
        }
    }

    // == Remove Least Recent ==
    /// Detaches and returns the least recently used entry.
    ///
    /// Returns `CacheError::Empty` if the list holds nothing.
    pub fn remove_least_recent(&mut self) -> Result<(String, V)> {
        let node = self.least_recent().ok_or(CacheError::Empty)?;
        Ok(self.remove(node))
    }

    // == Peek Least Recent ==
    /// Returns the least recently used entry's reference without removing it.
    pub fn least_recent(&self) -> Option<NodeRef> {
        self.tail.map(NodeRef)
    }

    /// Returns the entry at `node`, if it is live.
    pub fn get(&self, node: NodeRef) -> Option<&Entry<V>> {
        match self.slots.get(node.0) {
            Some(Slot::Occupied(node)) => Some(&node.entry),
            _ => None,
        }
    }

    // == Length ==
    /// Returns the number of entries in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let node = self.node(idx);
            cursor = node.next;
            Some(node.entry.key.as_str())
        })
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.tail = None;
        self.free = None;
        self.len = 0;
    }

    // == Link Helpers ==
    fn node(&self, idx: usize) -> &Node<V> {
        match &self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("vacant slot {} is linked", idx),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<V> {
        match &mut self.slots[idx] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("vacant slot {} is linked", idx),
        }
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => self.node_mut(head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }
}
