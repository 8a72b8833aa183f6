//! Directory actor
//!
//! The single writer. One task owns the counter, feed, session map, and
//! observer set; mutations arrive on the mailbox and are applied one at a
//! time. Each state change is persisted first, then committed to the read
//! snapshot, then broadcast — observers never see state that was not
//! durably written.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::observer::{ObserverSet, PushEvent};
use crate::stats::DirectoryStats;
use crate::storage::{DirectoryRecord, DirectoryStore, StorageError};

use super::command::Command;
use super::feed::{Feed, Item};
use super::handle::Snapshot;
use super::session::SessionMap;

pub(super) struct DirectoryActor<S> {
    pub(super) store: S,
    pub(super) counter: u32,
    pub(super) feed: Feed,
    pub(super) next_seq: u64,
    pub(super) sessions: SessionMap,
    pub(super) observers: ObserverSet,
    pub(super) snapshot: Arc<RwLock<Snapshot>>,
    pub(super) stats: Arc<DirectoryStats>,
    pub(super) rx: mpsc::Receiver<Command>,
}

impl<S: DirectoryStore> DirectoryActor<S> {
    /// Process commands until every handle is dropped
    pub(super) async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            self.handle_command(command).await;
        }

        tracing::debug!(
            count = self.counter,
            observers = self.observers.len(),
            "directory mailbox closed, actor exiting"
        );
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Register(registration) => {
                let id = registration.id().clone();
                let replaced = self.observers.insert(registration);
                tracing::info!(
                    observer = %id,
                    replaced,
                    observers = self.observers.len(),
                    "observer registered"
                );
            }
            Command::Unregister(id) => {
                let removed = self.observers.remove(&id);
                tracing::info!(
                    observer = %id,
                    removed,
                    observers = self.observers.len(),
                    "observer unregistered"
                );
            }
            Command::ClientConnected { conn_id, reply } => {
                let result = self.client_connected(&conn_id).await;
                let _ = reply.send(result);
            }
            Command::ClientDisconnected { conn_id, reply } => {
                let result = self.client_disconnected(&conn_id).await;
                let _ = reply.send(result);
            }
            Command::SubmitItem { key, reply } => {
                let result = self.submit_item(key).await;
                let _ = reply.send(result);
            }
        }
    }

    async fn client_connected(&mut self, conn_id: &str) -> Result<()> {
        if !self.sessions.sign_in(conn_id) {
            // Repeated connect while signed in must not re-fire the counter
            tracing::debug!(conn_id = %conn_id, "connect for already signed-in session");
            return Ok(());
        }

        self.counter += 1;

        if let Err(e) = self.persist().await {
            self.counter -= 1;
            self.sessions.sign_out(conn_id);
            return Err(e.into());
        }

        self.commit().await;
        tracing::info!(conn_id = %conn_id, count = self.counter, "client connected");
        self.broadcast(PushEvent::ClientsUpdated(self.counter));
        Ok(())
    }

    async fn client_disconnected(&mut self, conn_id: &str) -> Result<()> {
        let session = match self.sessions.sign_out(conn_id) {
            Some(session) => session,
            None => {
                // Unmatched disconnect: never drive the counter negative
                self.stats.record_unmatched_disconnect();
                tracing::warn!(
                    conn_id = %conn_id,
                    count = self.counter,
                    "disconnect without matching connect, decrement suppressed"
                );
                return Ok(());
            }
        };

        let previous = self.counter;
        self.counter = self.counter.saturating_sub(1);

        if let Err(e) = self.persist().await {
            self.counter = previous;
            self.sessions.restore(conn_id, session);
            return Err(e.into());
        }

        self.commit().await;
        tracing::info!(
            conn_id = %conn_id,
            count = self.counter,
            session_secs = session.signed_in_at.elapsed().as_secs(),
            "client disconnected"
        );
        self.broadcast(PushEvent::ClientsUpdated(self.counter));
        Ok(())
    }

    async fn submit_item(&mut self, key: String) -> Result<()> {
        if self.feed.contains(&key) {
            self.stats.record_duplicate_item();
            tracing::debug!(key = %key, "duplicate item ignored");
            return Ok(());
        }

        let previous_feed = self.feed.clone();
        self.feed.push(Item::new(key.clone(), self.next_seq));

        if let Err(e) = self.persist().await {
            self.feed = previous_feed;
            return Err(e.into());
        }

        self.next_seq += 1;
        self.commit().await;
        tracing::info!(key = %key, feed_len = self.feed.len(), "item accepted");
        self.broadcast(PushEvent::FeedUpdated(self.feed.snapshot()));
        Ok(())
    }

    async fn persist(&mut self) -> std::result::Result<(), StorageError> {
        let record = DirectoryRecord {
            counter: self.counter,
            feed: self.feed.snapshot(),
        };

        if let Err(e) = self.store.save(&record).await {
            tracing::error!(error = %e, "store write failed, rolling back mutation");
            return Err(e);
        }

        Ok(())
    }

    /// Publish the post-mutation state for concurrent readers
    async fn commit(&self) {
        let mut snapshot = self.snapshot.write().await;
        snapshot.count = self.counter;
        snapshot.feed = self.feed.snapshot();
    }

    fn broadcast(&mut self, event: PushEvent) {
        let report = self.observers.broadcast(&event);
        self.stats
            .record_broadcast(report.delivered, report.failed, report.evicted);

        tracing::debug!(
            event = event.kind(),
            delivered = report.delivered,
            failed = report.failed,
            "broadcast complete"
        );
    }
}
