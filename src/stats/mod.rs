//! Directory runtime statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the directory actor, readable from any task
#[derive(Debug, Default)]
pub struct DirectoryStats {
    /// Broadcasts fanned out (one per committed state change)
    broadcasts: AtomicU64,
    /// Per-observer deliveries that were accepted
    deliveries: AtomicU64,
    /// Per-observer deliveries that failed
    delivery_failures: AtomicU64,
    /// Observers evicted for closed or persistently full channels
    observers_evicted: AtomicU64,
    /// Submits ignored because the key was already in the feed
    duplicate_items: AtomicU64,
    /// Disconnects with no matching prior connect
    unmatched_disconnects: AtomicU64,
}

/// Point-in-time copy of [`DirectoryStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub broadcasts: u64,
    pub deliveries: u64,
    pub delivery_failures: u64,
    pub observers_evicted: u64,
    pub duplicate_items: u64,
    pub unmatched_disconnects: u64,
}

impl DirectoryStats {
    /// Create zeroed stats
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_broadcast(&self, delivered: u32, failed: u32, evicted: u32) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
        self.deliveries.fetch_add(delivered as u64, Ordering::Relaxed);
        self.delivery_failures
            .fetch_add(failed as u64, Ordering::Relaxed);
        self.observers_evicted
            .fetch_add(evicted as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate_item(&self) {
        self.duplicate_items.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unmatched_disconnect(&self) {
        self.unmatched_disconnects.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            observers_evicted: self.observers_evicted.load(Ordering::Relaxed),
            duplicate_items: self.duplicate_items.load(Ordering::Relaxed),
            unmatched_disconnects: self.unmatched_disconnects.load(Ordering::Relaxed),
        }
    }
}
