//! Observer registry and fanout
//!
//! The registry maps opaque replica identities to bounded push channels.
//! Membership is a lookup-only back-reference: the directory never owns a
//! replica's lifecycle, only its registration, and the whole set is
//! volatile — a restarted directory starts with an empty registry and
//! relies on live replicas re-registering.
//!
//! Fanout is best-effort and isolated per target. Delivery uses a
//! non-blocking send, so a full or closed channel on one observer cannot
//! stall or fail the others or the mutation that triggered the broadcast.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::push::PushEvent;

/// Default capacity for a registration's push channel
pub const DEFAULT_PUSH_CAPACITY: usize = 16;

/// Opaque, replica-supplied observer identity
///
/// Any stable string works; the replica presents the same identity to
/// unregister itself later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObserverId(String);

impl ObserverId {
    /// Create an observer identity
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObserverId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObserverId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// An observer identity paired with its push channel sender
///
/// Built by the replica; the receiver half stays with the replica, which
/// relays pushed events to its locally connected clients.
#[derive(Debug)]
pub struct ObserverRegistration {
    id: ObserverId,
    tx: mpsc::Sender<PushEvent>,
}

impl ObserverRegistration {
    /// Create a registration from an existing sender
    pub fn new(id: impl Into<ObserverId>, tx: mpsc::Sender<PushEvent>) -> Self {
        Self { id: id.into(), tx }
    }

    /// Create a registration and its push channel with default capacity
    pub fn channel(id: impl Into<ObserverId>) -> (Self, mpsc::Receiver<PushEvent>) {
        Self::channel_with_capacity(id, DEFAULT_PUSH_CAPACITY)
    }

    /// Create a registration and its push channel with a custom capacity
    pub fn channel_with_capacity(
        id: impl Into<ObserverId>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<PushEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(id, tx), rx)
    }

    /// Get the observer identity
    pub fn id(&self) -> &ObserverId {
        &self.id
    }

    pub(crate) fn into_parts(self) -> (ObserverId, mpsc::Sender<PushEvent>) {
        (self.id, self.tx)
    }
}

/// Outcome of one broadcast across the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FanoutReport {
    /// Observers that accepted the event
    pub delivered: u32,
    /// Observers whose delivery failed this round
    pub failed: u32,
    /// Observers evicted during this round
    pub evicted: u32,
}

struct ObserverEntry {
    tx: mpsc::Sender<PushEvent>,
    consecutive_failures: u32,
}

/// The set of registered observers, keyed by identity
pub(crate) struct ObserverSet {
    observers: HashMap<ObserverId, ObserverEntry>,
    failure_limit: u32,
}

impl ObserverSet {
    /// Create an empty set with the given eviction threshold (0 = never
    /// evict for full channels; closed channels are always evicted)
    pub fn new(failure_limit: u32) -> Self {
        Self {
            observers: HashMap::new(),
            failure_limit,
        }
    }

    /// Insert a registration; a duplicate identity replaces the previous
    /// channel. Returns true when an existing registration was replaced.
    pub fn insert(&mut self, registration: ObserverRegistration) -> bool {
        let (id, tx) = registration.into_parts();
        self.observers
            .insert(
                id,
                ObserverEntry {
                    tx,
                    consecutive_failures: 0,
                },
            )
            .is_some()
    }

    /// Remove a registration; an absent identity is a no-op.
    /// Returns true when a registration was removed.
    pub fn remove(&mut self, id: &ObserverId) -> bool {
        self.observers.remove(id).is_some()
    }

    /// Number of registered observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Deliver one event to every registered observer
    ///
    /// Failures are logged and counted per target, never propagated. An
    /// observer whose channel is closed is evicted immediately; one whose
    /// channel stays full is evicted after `failure_limit` consecutive
    /// failures. A successful delivery resets the failure count.
    pub fn broadcast(&mut self, event: &PushEvent) -> FanoutReport {
        let mut report = FanoutReport::default();
        let mut evict = Vec::new();

        for (id, entry) in self.observers.iter_mut() {
            match entry.tx.try_send(event.clone()) {
                Ok(()) => {
                    entry.consecutive_failures = 0;
                    report.delivered += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    report.failed += 1;
                    tracing::warn!(observer = %id, "observer channel closed, evicting");
                    evict.push(id.clone());
                }
                Err(TrySendError::Full(_)) => {
                    report.failed += 1;
                    entry.consecutive_failures += 1;

                    if self.failure_limit > 0 && entry.consecutive_failures >= self.failure_limit {
                        tracing::warn!(
                            observer = %id,
                            failures = entry.consecutive_failures,
                            "observer not keeping up, evicting"
                        );
                        evict.push(id.clone());
                    } else {
                        tracing::warn!(
                            observer = %id,
                            failures = entry.consecutive_failures,
                            event = event.kind(),
                            "push delivery failed"
                        );
                    }
                }
            }
        }

        for id in evict {
            self.observers.remove(&id);
            report.evicted += 1;
        }

        report
    }
}
