//! Sample values shared by test suites.

use kokaq_core::{DeliveredMessage, QueueRef};

/// Namespace used by most scenarios.
pub const NAMESPACE: &str = "acct";
/// Queue used by most scenarios.
pub const QUEUE: &str = "orders";

/// Reference to the default scenario queue.
#[must_use]
pub fn orders_queue() -> QueueRef {
    QueueRef::new(NAMESPACE, QUEUE)
}

/// Build a delivered message with a UTF-8 body.
#[must_use]
pub fn delivered(message_id: &str, lock_id: &str, priority: u64, body: &str) -> DeliveredMessage {
    DeliveredMessage {
        message_id: message_id.to_string(),
        lock_id: lock_id.to_string(),
        priority,
        body: body.as_bytes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivered_keeps_body_bytes() {
        let message = delivered("m-1", "l-1", 4, "hello");
        assert_eq!(message.body_text(), "hello");
        assert_eq!(orders_queue().to_string(), "acct/orders");
    }
}
