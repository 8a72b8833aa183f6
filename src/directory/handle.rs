//! Directory handle
//!
//! The public face of a directory instance. Handles are cheap to clone and
//! share one actor: mutations are sent through the mailbox and awaited;
//! reads are served from the committed snapshot without queuing behind the
//! mutation mailbox.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, RwLock};

use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};
use crate::observer::{ObserverId, ObserverRegistration, ObserverSet};
use crate::stats::{DirectoryStats, StatsSnapshot};
use crate::storage::DirectoryStore;

use super::actor::DirectoryActor;
use super::command::Command;
use super::feed::{Feed, Item};
use super::session::SessionMap;

/// Committed state published by the actor after each successful mutation
#[derive(Debug, Default)]
pub(super) struct Snapshot {
    pub(super) count: u32,
    pub(super) feed: Vec<Item>,
}

/// Handle to a running directory instance
///
/// One directory serves a whole fleet of replicas; spawn it once and hand
/// clones of this handle to the ingestion adapter and every replica.
///
/// Known gap: there is no liveness mechanism for sessions. A replica that
/// crashes without reporting its disconnects leaves those sessions signed
/// in and the live counter inflated until matching disconnects arrive.
#[derive(Debug, Clone)]
pub struct Directory {
    tx: mpsc::Sender<Command>,
    snapshot: Arc<RwLock<Snapshot>>,
    stats: Arc<DirectoryStats>,
}

impl Directory {
    /// Spawn a directory actor on the current tokio runtime
    ///
    /// Loads the durable counter and feed from the store before accepting
    /// any operation; fails if the store cannot be read. The observer set
    /// always starts empty — live replicas must (re-)register.
    ///
    /// The actor exits once every handle has been dropped.
    pub async fn spawn<S: DirectoryStore>(config: DirectoryConfig, mut store: S) -> Result<Self> {
        let record = store.load().await?;

        let mut feed = Feed::with_capacity(config.feed_capacity);
        let mut next_seq = 0;
        for item in record.feed {
            next_seq = next_seq.max(item.received_at + 1);
            feed.push(item);
        }

        let counter = record.counter;
        let snapshot = Arc::new(RwLock::new(Snapshot {
            count: counter,
            feed: feed.snapshot(),
        }));
        let stats = Arc::new(DirectoryStats::new());
        let (tx, rx) = mpsc::channel(config.mailbox_capacity);

        tracing::info!(
            count = counter,
            feed_len = feed.len(),
            feed_capacity = feed.capacity(),
            "directory activated"
        );

        let actor = DirectoryActor {
            store,
            counter,
            feed,
            next_seq,
            sessions: SessionMap::new(),
            observers: ObserverSet::new(config.observer_failure_limit),
            snapshot: Arc::clone(&snapshot),
            stats: Arc::clone(&stats),
            rx,
        };
        tokio::spawn(actor.run());

        Ok(Self {
            tx,
            snapshot,
            stats,
        })
    }

    /// Register a replica as an observer of state changes
    ///
    /// Idempotent by identity: re-registering replaces the previous push
    /// channel. Registration is fire-and-forget.
    pub async fn register_observer(&self, registration: ObserverRegistration) {
        if self.tx.send(Command::Register(registration)).await.is_err() {
            tracing::warn!("directory closed, observer registration dropped");
        }
    }

    /// Remove a previously registered observer
    ///
    /// An identity that was never registered (or was already evicted) is a
    /// no-op, not an error.
    pub async fn unregister_observer(&self, id: impl Into<ObserverId>) {
        if self.tx.send(Command::Unregister(id.into())).await.is_err() {
            tracing::warn!("directory closed, observer unregistration dropped");
        }
    }

    /// Record a client connect reported by a replica
    ///
    /// Signs the connection in and increments the live counter exactly
    /// once; repeated connects for the same connection id are counter
    /// no-ops. Broadcasts the new count to all observers on change.
    pub async fn client_connected(&self, conn_id: impl Into<String>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ClientConnected {
            conn_id: conn_id.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| DirectoryError::Closed)?
    }

    /// Record a client disconnect reported by a replica
    ///
    /// Destroys the session and decrements the live counter. A disconnect
    /// with no matching prior connect is logged and succeeds without
    /// touching the counter.
    pub async fn client_disconnected(&self, conn_id: impl Into<String>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::ClientDisconnected {
            conn_id: conn_id.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| DirectoryError::Closed)?
    }

    /// Submit a new item to the recent feed
    ///
    /// Duplicates (by key) are silently ignored, which makes at-least-once
    /// upstream delivery safe. On acceptance the oldest item is evicted
    /// beyond capacity and the new feed snapshot is broadcast.
    pub async fn submit_item(&self, key: impl Into<String>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SubmitItem {
            key: key.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| DirectoryError::Closed)?
    }

    /// Current live client count (committed state)
    pub async fn active_count(&self) -> u32 {
        self.snapshot.read().await.count
    }

    /// Current recent feed, oldest first (committed state)
    ///
    /// Replicas push this snapshot to a newly connected end user; it is
    /// not broadcast.
    pub async fn recent_feed(&self) -> Vec<Item> {
        self.snapshot.read().await.feed.clone()
    }

    /// Runtime statistics for this directory instance
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| DirectoryError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    async fn spawn_default() -> Directory {
        Directory::spawn(DirectoryConfig::default(), MemoryStore::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_disconnect_counts() {
        let directory = spawn_default().await;

        directory.client_connected("a").await.unwrap();
        directory.client_connected("b").await.unwrap();
        assert_eq!(directory.active_count().await, 2);

        directory.client_disconnected("a").await.unwrap();
        assert_eq!(directory.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_repeated_connect_is_idempotent() {
        let directory = spawn_default().await;

        directory.client_connected("a").await.unwrap();
        directory.client_connected("a").await.unwrap();

        assert_eq!(directory.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_unmatched_disconnect_is_clamped() {
        let directory = spawn_default().await;

        directory.client_disconnected("ghost").await.unwrap();

        assert_eq!(directory.active_count().await, 0);
        assert_eq!(directory.stats().unmatched_disconnects, 1);
    }

    #[tokio::test]
    async fn test_submit_and_read_feed() {
        let directory = spawn_default().await;

        directory.submit_item("p1").await.unwrap();
        directory.submit_item("p2").await.unwrap();

        let feed = directory.recent_feed().await;
        let keys: Vec<&str> = feed.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_spawn_restores_persisted_state() {
        let store = MemoryStore::new();

        let first = Directory::spawn(DirectoryConfig::default(), store.clone())
            .await
            .unwrap();
        first.client_connected("a").await.unwrap();
        first.submit_item("p1").await.unwrap();
        drop(first);

        let second = Directory::spawn(DirectoryConfig::default(), store)
            .await
            .unwrap();
        assert_eq!(second.active_count().await, 1);
        assert_eq!(second.recent_feed().await.len(), 1);

        // Ordering tokens continue after the restart instead of colliding
        second.submit_item("p2").await.unwrap();
        let feed = second.recent_feed().await;
        assert!(feed[1].received_at > feed[0].received_at);
    }
}
