//! Presence & broadcast directory
//!
//! The directory is the single logical coordinator behind a fleet of
//! stateless front-end replicas: it owns the live client counter and the
//! bounded recent-items feed, serializes every mutation, and fans each
//! committed change out to the registered replicas.
//!
//! # Architecture
//!
//! ```text
//!   replica A ──┐  connect/disconnect            ┌──► replica A rx
//!   replica B ──┤  register/unregister   fanout  ├──► replica B rx
//!   ingestion ──┘  submit item                   └──► replica C rx
//!        │                                            ▲
//!        ▼                                            │
//!   mpsc mailbox ──► DirectoryActor (single writer) ──┘
//!                      │  counter, feed, sessions, observers
//!                      │
//!                      ├──► DirectoryStore (persist before broadcast)
//!                      └──► committed Snapshot (lock for readers)
//! ```
//!
//! Mutations are applied strictly one at a time by the actor task; that
//! serialization is the whole correctness story for the non-negative
//! counter and the feed's dedup/capacity invariants. Reads never enter
//! the mailbox — they see the latest committed snapshot.

mod actor;
mod command;
pub mod feed;
mod handle;
pub mod session;

pub use feed::{Feed, Item};
pub use handle::Directory;
pub use session::SessionPhase;
