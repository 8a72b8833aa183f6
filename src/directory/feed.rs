//! Recent-items feed
//!
//! A capacity-bounded, insertion-ordered buffer of the most recent unique
//! submitted items. New clients receive its snapshot as catchup state, so
//! the buffer keeps strict FIFO order: when a unique item is appended past
//! capacity, the oldest is evicted regardless of any external timestamp.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A single submitted item
///
/// `received_at` is the ordering token the directory assigns at insertion.
/// Tokens increase monotonically for the lifetime of a directory and are
/// re-derived from the persisted feed on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Submitter-provided uniqueness key (e.g. a content location)
    pub key: String,
    /// Insertion ordering token
    pub received_at: u64,
}

impl Item {
    /// Create a new item
    pub fn new(key: impl Into<String>, received_at: u64) -> Self {
        Self {
            key: key.into(),
            received_at,
        }
    }
}

/// Bounded feed of recent items
///
/// Invariants: no two items share a key, `len() <= capacity`, iteration
/// order is insertion order (ascending).
#[derive(Debug, Clone)]
pub struct Feed {
    /// Maximum number of retained items
    capacity: usize,
    /// Items in insertion order, oldest first
    items: VecDeque<Item>,
}

impl Feed {
    /// Create a feed with the given capacity (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            items: VecDeque::new(),
        }
    }

    /// Get the feed capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of retained items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the feed is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check whether an item with this key is currently retained
    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key == key)
    }

    /// Append an item, evicting the oldest when over capacity
    ///
    /// Returns false (and leaves the feed untouched) if an item with the
    /// same key is already retained.
    pub fn push(&mut self, item: Item) -> bool {
        if self.contains(&item.key) {
            return false;
        }

        self.items.push_back(item);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }

        true
    }

    /// Snapshot the current items, oldest first
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.iter().cloned().collect()
    }

    /// Iterate the retained items, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, seq: u64) -> Item {
        Item::new(key, seq)
    }

    #[test]
    fn test_push_and_order() {
        let mut feed = Feed::with_capacity(5);

        assert!(feed.push(item("a", 0)));
        assert!(feed.push(item("b", 1)));
        assert!(feed.push(item("c", 2)));

        let keys: Vec<&str> = feed.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(feed.len(), 3);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut feed = Feed::with_capacity(5);

        assert!(feed.push(item("a", 0)));
        assert!(!feed.push(item("a", 1)));

        assert_eq!(feed.len(), 1);
        assert_eq!(feed.snapshot()[0].received_at, 0);
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut feed = Feed::with_capacity(5);

        for (seq, key) in ["x1", "x2", "x3", "x4", "x5", "x6"].iter().enumerate() {
            assert!(feed.push(item(key, seq as u64)));
        }

        let keys: Vec<&str> = feed.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["x2", "x3", "x4", "x5", "x6"]);
        assert_eq!(feed.len(), 5);
    }

    #[test]
    fn test_evicted_key_can_be_resubmitted() {
        let mut feed = Feed::with_capacity(2);

        feed.push(item("a", 0));
        feed.push(item("b", 1));
        feed.push(item("c", 2)); // evicts "a"

        assert!(!feed.contains("a"));
        assert!(feed.push(item("a", 3)));

        let keys: Vec<&str> = feed.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a"]);
    }

    #[test]
    fn test_capacity_floored_at_one() {
        let mut feed = Feed::with_capacity(0);

        assert_eq!(feed.capacity(), 1);
        feed.push(item("a", 0));
        feed.push(item("b", 1));
        assert_eq!(feed.len(), 1);
        assert!(feed.contains("b"));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut feed = Feed::with_capacity(5);
        feed.push(item("a", 0));

        let snapshot = feed.snapshot();
        feed.push(item("b", 1));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn test_item_serde_roundtrip() {
        let original = item("https://storage/images/42.jpg", 7);

        let encoded = serde_json::to_string(&original).unwrap();
        let decoded: Item = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, original);
    }
}
