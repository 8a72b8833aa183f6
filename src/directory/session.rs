//! Per-connection session tracking
//!
//! Sessions gate the live counter: exactly one increment per logical
//! connect and one decrement per matching disconnect. A session is a plain
//! keyed map entry, created on first connect and removed on disconnect;
//! absence from the map is the `Unknown` state. Sessions are never
//! persisted — after a directory restart every connection is `Unknown`
//! until its next connect/disconnect pair.

use std::collections::HashMap;
use std::time::Instant;

/// Sign-in state for one connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session exists for the connection
    Unknown,
    /// Connected and counted in the live counter
    SignedIn,
}

/// State kept per signed-in connection
#[derive(Debug)]
pub(crate) struct Session {
    /// When the session signed in
    pub signed_in_at: Instant,
}

/// Map of connection identifier to its session
///
/// Only the directory actor mutates this map; sessions never interact
/// with one another.
#[derive(Debug, Default)]
pub(crate) struct SessionMap {
    sessions: HashMap<String, Session>,
}

impl SessionMap {
    /// Create an empty session map
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sign-in phase for a connection
    pub fn phase(&self, conn_id: &str) -> SessionPhase {
        if self.sessions.contains_key(conn_id) {
            SessionPhase::SignedIn
        } else {
            SessionPhase::Unknown
        }
    }

    /// Sign a connection in
    ///
    /// Returns true when the session transitioned to `SignedIn`; false when
    /// it was already signed in (the counter must not be re-fired).
    pub fn sign_in(&mut self, conn_id: &str) -> bool {
        if self.sessions.contains_key(conn_id) {
            return false;
        }

        self.sessions.insert(
            conn_id.to_string(),
            Session {
                signed_in_at: Instant::now(),
            },
        );
        true
    }

    /// Sign a connection out, destroying its session
    ///
    /// Returns the removed session, or None when the connection was unknown
    /// (unmatched disconnect).
    pub fn sign_out(&mut self, conn_id: &str) -> Option<Session> {
        self.sessions.remove(conn_id)
    }

    /// Put a session back after a failed mutation
    pub fn restore(&mut self, conn_id: &str, session: Session) {
        self.sessions.insert(conn_id.to_string(), session);
    }

    /// Number of signed-in sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_creates_session() {
        let mut sessions = SessionMap::new();

        assert_eq!(sessions.phase("conn-1"), SessionPhase::Unknown);
        assert!(sessions.sign_in("conn-1"));
        assert_eq!(sessions.phase("conn-1"), SessionPhase::SignedIn);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_repeated_sign_in_is_idempotent() {
        let mut sessions = SessionMap::new();

        assert!(sessions.sign_in("conn-1"));
        assert!(!sessions.sign_in("conn-1"));
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_sign_out_destroys_session() {
        let mut sessions = SessionMap::new();

        sessions.sign_in("conn-1");
        assert!(sessions.sign_out("conn-1").is_some());
        assert_eq!(sessions.phase("conn-1"), SessionPhase::Unknown);
        assert_eq!(sessions.len(), 0);
    }

    #[test]
    fn test_unmatched_sign_out() {
        let mut sessions = SessionMap::new();

        assert!(sessions.sign_out("never-connected").is_none());
        assert_eq!(sessions.len(), 0);
    }

    #[test]
    fn test_restore_after_failed_mutation() {
        let mut sessions = SessionMap::new();

        sessions.sign_in("conn-1");
        let session = sessions.sign_out("conn-1").unwrap();
        sessions.restore("conn-1", session);

        assert_eq!(sessions.phase("conn-1"), SessionPhase::SignedIn);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut sessions = SessionMap::new();

        sessions.sign_in("a");
        sessions.sign_in("b");
        sessions.sign_out("a");

        assert_eq!(sessions.phase("a"), SessionPhase::Unknown);
        assert_eq!(sessions.phase("b"), SessionPhase::SignedIn);
    }
}
