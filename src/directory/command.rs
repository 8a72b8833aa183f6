//! Directory mailbox commands
//!
//! Every mutation reaches the actor as one of these messages. The mailbox
//! is the serialization point: commands are processed strictly one at a
//! time, which is the sole mechanism behind the counter and feed
//! invariants.

use tokio::sync::oneshot;

use crate::error::DirectoryError;
use crate::observer::{ObserverId, ObserverRegistration};

pub(crate) enum Command {
    /// Add an observer (idempotent by identity)
    Register(ObserverRegistration),
    /// Remove an observer (absent identity is a no-op)
    Unregister(ObserverId),
    /// A client connected on some replica
    ClientConnected {
        conn_id: String,
        reply: oneshot::Sender<Result<(), DirectoryError>>,
    },
    /// A client disconnected on some replica
    ClientDisconnected {
        conn_id: String,
        reply: oneshot::Sender<Result<(), DirectoryError>>,
    },
    /// A new item arrived from the ingestion side
    SubmitItem {
        key: String,
        reply: oneshot::Sender<Result<(), DirectoryError>>,
    },
}
