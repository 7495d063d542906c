//! JSON bodies exchanged with the `/v1` API.

use base64::{Engine as _, engine::general_purpose};
use kokaq_core::{DeliveredMessage, FailureReason, RemoteError, RemoteResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct CreateRequest<'a> {
    pub(crate) name: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamespaceList {
    #[serde(default)]
    pub(crate) namespaces: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueueList {
    #[serde(default)]
    pub(crate) queues: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendRequest {
    pub(crate) body_b64: String,
    pub(crate) priority: u64,
}

impl SendRequest {
    pub(crate) fn new(body: &[u8], priority: u64) -> Self {
        Self {
            body_b64: general_purpose::STANDARD.encode(body),
            priority,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReceiveRequest {
    pub(crate) batch_size: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct PeekRequest {
    pub(crate) count: u32,
    pub(crate) wait_ms: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct AckRequest<'a> {
    pub(crate) lock_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NackRequest<'a> {
    pub(crate) lock_id: &'a str,
    pub(crate) reason: FailureReason,
    pub(crate) allow_redelivery: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageBatch {
    #[serde(default)]
    pub(crate) messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMessage {
    message_id: String,
    #[serde(default)]
    lock_id: String,
    priority: u64,
    #[serde(default)]
    body_b64: String,
}

impl MessageBatch {
    pub(crate) fn into_messages(self) -> RemoteResult<Vec<DeliveredMessage>> {
        self.messages
            .into_iter()
            .map(WireMessage::into_delivered)
            .collect()
    }
}

impl WireMessage {
    fn into_delivered(self) -> RemoteResult<DeliveredMessage> {
        let body = general_purpose::STANDARD
            .decode(self.body_b64.as_bytes())
            .map_err(|err| {
                RemoteError::protocol(format!(
                    "message {} carried an invalid body: {err}",
                    self.message_id
                ))
            })?;
        Ok(DeliveredMessage {
            message_id: self.message_id,
            lock_id: self.lock_id,
            priority: self.priority,
            body,
        })
    }
}
