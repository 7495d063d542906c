//! Data transfer objects exchanged with the queue service.

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Fully qualified queue address: a queue is always scoped to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueRef {
    /// Owning namespace.
    pub namespace: String,
    /// Queue name within the namespace.
    pub queue: String,
}

impl QueueRef {
    /// Construct a queue reference.
    #[must_use]
    pub fn new(namespace: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            queue: queue.into(),
        }
    }
}

impl Display for QueueRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.namespace, self.queue)
    }
}

/// Namespace descriptor returned by create/resolve calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    /// Namespace name as stored by the service.
    pub name: String,
}

/// Queue descriptor returned by create/resolve calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueInfo {
    /// Owning namespace.
    pub namespace: String,
    /// Queue name.
    pub name: String,
}

/// Acknowledgement of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    /// Identifier assigned by the service.
    pub message_id: String,
    /// Lock handle when the service locks on send.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_id: Option<String>,
}

/// One delivery of a message to this receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMessage {
    /// Message identifier.
    pub message_id: String,
    /// Handle for this delivery attempt, needed to ack or nack.
    pub lock_id: String,
    /// Delivery priority.
    pub priority: u64,
    /// Raw payload.
    pub body: Vec<u8>,
}

impl DeliveredMessage {
    /// Payload decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Reason attached to a negative acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// The consumer failed while handling the message.
    ProcessingError,
    /// The consumer ran out of time.
    Timeout,
    /// The consumer refused the message outright.
    Rejected,
    /// No reason supplied.
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_ref_displays_as_path() {
        assert_eq!(QueueRef::new("acct", "orders").to_string(), "acct/orders");
    }

    #[test]
    fn failure_reason_uses_wire_casing() {
        let encoded = serde_json::to_string(&FailureReason::ProcessingError)
            .expect("reason should serialize");
        assert_eq!(encoded, "\"PROCESSING_ERROR\"");
    }

    #[test]
    fn receipt_lock_is_optional_on_the_wire() {
        let receipt: MessageReceipt =
            serde_json::from_str(r#"{"message_id":"m-1"}"#).expect("receipt should parse");
        assert_eq!(receipt.message_id, "m-1");
        assert!(receipt.lock_id.is_none());
    }

    #[test]
    fn body_text_replaces_invalid_utf8() {
        let message = DeliveredMessage {
            message_id: "m-1".into(),
            lock_id: "l-1".into(),
            priority: 3,
            body: vec![b'o', b'k', 0xff],
        };
        assert_eq!(message.body_text(), "ok\u{fffd}");
    }
}
