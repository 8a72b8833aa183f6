//! Push payloads delivered to registered observers
//!
//! Every committed mutation fans one of these out to the full observer
//! set. The payload always reflects the post-mutation committed state;
//! there is no redelivery and no cross-observer ordering guarantee.

use crate::directory::Item;

/// A state-change notification pushed to an observer
///
/// Cheap to clone; one copy is delivered per registered observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// The live client count changed
    ClientsUpdated(u32),
    /// The recent-items feed changed; carries the full ordered snapshot
    FeedUpdated(Vec<Item>),
}

impl PushEvent {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            PushEvent::ClientsUpdated(_) => "clients_updated",
            PushEvent::FeedUpdated(_) => "feed_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(PushEvent::ClientsUpdated(3).kind(), "clients_updated");
        assert_eq!(PushEvent::FeedUpdated(Vec::new()).kind(), "feed_updated");
    }
}
