//! Submit-item wire message
//!
//! The payload an ingestion adapter receives from its upstream (e.g. a
//! pub/sub topic fed by the upload endpoint) and turns into a
//! `submit_item` call. Upstream delivery is at-least-once; duplicates are
//! safe because submission is idempotent by key.

use serde::{Deserialize, Serialize};

/// A submitted item announcement: `{"key": "<string>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessage {
    /// Uniqueness key for dedup (e.g. the stored content's location)
    pub key: String,
}

impl SubmitMessage {
    /// Create a submit message
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_payload() {
        let message: SubmitMessage =
            serde_json::from_str(r#"{"key": "https://storage/images/42.jpg"}"#).unwrap();

        assert_eq!(message.key, "https://storage/images/42.jpg");
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let result = serde_json::from_str::<SubmitMessage>(r#"{"url": "x"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_encode_roundtrip() {
        let message = SubmitMessage::new("k1");

        let encoded = serde_json::to_string(&message).unwrap();
        assert_eq!(encoded, r#"{"key":"k1"}"#);
        assert_eq!(
            serde_json::from_str::<SubmitMessage>(&encoded).unwrap(),
            message
        );
    }
}
