//! Directory configuration

/// Directory configuration options
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Maximum number of items retained in the recent feed
    pub feed_capacity: usize,

    /// Capacity of the mutation mailbox; senders wait when it is full
    pub mailbox_capacity: usize,

    /// Consecutive failed deliveries before an observer is evicted
    /// (0 = never evict on full channels)
    pub observer_failure_limit: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            feed_capacity: 5,
            mailbox_capacity: 64,
            observer_failure_limit: 3,
        }
    }
}

impl DirectoryConfig {
    /// Set the feed capacity (minimum 1)
    pub fn feed_capacity(mut self, capacity: usize) -> Self {
        self.feed_capacity = capacity.max(1);
        self
    }

    /// Set the mutation mailbox capacity (minimum 1)
    pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity.max(1);
        self
    }

    /// Set the observer eviction threshold; 0 disables eviction
    pub fn observer_failure_limit(mut self, limit: u32) -> Self {
        self.observer_failure_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DirectoryConfig::default();

        assert_eq!(config.feed_capacity, 5);
        assert_eq!(config.mailbox_capacity, 64);
        assert_eq!(config.observer_failure_limit, 3);
    }

    #[test]
    fn test_builder_feed_capacity() {
        let config = DirectoryConfig::default().feed_capacity(10);

        assert_eq!(config.feed_capacity, 10);
    }

    #[test]
    fn test_builder_feed_capacity_floored() {
        // A zero-capacity feed would make every submit a no-op
        let config = DirectoryConfig::default().feed_capacity(0);

        assert_eq!(config.feed_capacity, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let config = DirectoryConfig::default()
            .feed_capacity(8)
            .mailbox_capacity(128)
            .observer_failure_limit(0);

        assert_eq!(config.feed_capacity, 8);
        assert_eq!(config.mailbox_capacity, 128);
        assert_eq!(config.observer_failure_limit, 0);
    }
}
