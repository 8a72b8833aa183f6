//! # presence-rs
//!
//! A presence & broadcast directory for horizontally scaled real-time
//! front ends. Many stateless replicas present one consistent view of
//! (a) how many clients are currently connected and (b) the most recent
//! submitted items, no matter which replica an end user reaches.
//!
//! The directory is a single-writer actor: it owns the live counter, the
//! bounded recent-items feed, the per-connection sessions, and the
//! volatile observer registry, and applies every mutation one at a time
//! from a mailbox. Counter and feed are persisted through a pluggable
//! [`DirectoryStore`] before each change is broadcast; the observer set is
//! rebuilt by live replicas re-registering after a restart.
//!
//! # Example
//!
//! ```no_run
//! use presence_rs::{Directory, DirectoryConfig, MemoryStore, ObserverRegistration, PushEvent};
//!
//! #[tokio::main]
//! async fn main() -> presence_rs::Result<()> {
//!     let directory = Directory::spawn(DirectoryConfig::default(), MemoryStore::new()).await?;
//!
//!     // A replica registers itself, then relays pushes to its own clients
//!     let (registration, mut pushes) = ObserverRegistration::channel("replica-1");
//!     directory.register_observer(registration).await;
//!
//!     directory.client_connected("conn-1").await?;
//!     directory.submit_item("https://storage/images/1.jpg").await?;
//!
//!     while let Some(event) = pushes.recv().await {
//!         match event {
//!             PushEvent::ClientsUpdated(count) => println!("clients: {count}"),
//!             PushEvent::FeedUpdated(items) => println!("feed: {} items", items.len()),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod ingest;
pub mod observer;
pub mod stats;
pub mod storage;

pub use config::DirectoryConfig;
pub use directory::{Directory, Feed, Item};
pub use error::{DirectoryError, Result};
pub use ingest::SubmitMessage;
pub use observer::{ObserverId, ObserverRegistration, PushEvent};
pub use stats::{DirectoryStats, StatsSnapshot};
pub use storage::{DirectoryRecord, DirectoryStore, JsonFileStore, MemoryStore, StorageError};
