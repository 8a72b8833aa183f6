//! Observer registry and push fanout
//!
//! Replicas register themselves as observers to receive a push for every
//! committed directory mutation, then relay those pushes to their own
//! locally connected clients.
//!
//! # Architecture
//!
//! ```text
//!              Directory actor
//!        ┌──────────────────────────┐
//!        │ ObserverSet {            │
//!        │   id -> mpsc::Sender,    │
//!        │   consecutive_failures,  │
//!        │ }                        │
//!        └────────────┬─────────────┘
//!                     │ try_send (per target, isolated)
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//!     [Replica]   [Replica]   [Replica]
//!     rx.recv()   rx.recv()   rx.recv()
//!         │           │           │
//!         └──► relay to local end-user connections
//! ```
//!
//! The registry is intentionally not durable: it is rebuilt by live
//! replicas re-registering after a directory restart.

pub mod push;
pub mod registry;

pub use push::PushEvent;
pub use registry::{ObserverId, ObserverRegistration, DEFAULT_PUSH_CAPACITY};

pub(crate) use registry::ObserverSet;
