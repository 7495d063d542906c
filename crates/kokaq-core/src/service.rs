//! The queue-service facade consumed by the shell.

use async_trait::async_trait;

use crate::error::RemoteResult;
use crate::model::{
    DeliveredMessage, FailureReason, MessageReceipt, NamespaceInfo, QueueInfo, QueueRef,
};

/// Remote operations offered by a Kokaq deployment.
///
/// Implementations classify every failure as a [`crate::RemoteError`]. Calls are
/// cancelled by dropping the returned future; deadlines belong to the
/// implementation and are fixed when it is constructed.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Probe the service; used once at startup to validate the connection.
    async fn ping(&self) -> RemoteResult<()>;

    /// Create a namespace.
    async fn create_namespace(&self, name: &str) -> RemoteResult<NamespaceInfo>;
    /// Look up an existing namespace.
    async fn resolve_namespace(&self, name: &str) -> RemoteResult<NamespaceInfo>;
    /// Delete a namespace.
    async fn delete_namespace(&self, name: &str) -> RemoteResult<()>;
    /// List namespace names.
    async fn list_namespaces(&self) -> RemoteResult<Vec<String>>;

    /// Create a queue inside its namespace.
    async fn create_queue(&self, queue: &QueueRef) -> RemoteResult<QueueInfo>;
    /// Look up an existing queue.
    async fn resolve_queue(&self, queue: &QueueRef) -> RemoteResult<QueueInfo>;
    /// Delete a queue.
    async fn delete_queue(&self, queue: &QueueRef) -> RemoteResult<()>;
    /// List queue names inside a namespace.
    async fn list_queues(&self, namespace: &str) -> RemoteResult<Vec<String>>;

    /// Send a message with the given priority.
    async fn send(
        &self,
        queue: &QueueRef,
        body: &[u8],
        priority: u64,
    ) -> RemoteResult<MessageReceipt>;

    /// Receive up to `batch_size` messages, locking each for this receiver.
    async fn receive(
        &self,
        queue: &QueueRef,
        batch_size: u32,
    ) -> RemoteResult<Vec<DeliveredMessage>>;

    /// Acknowledge a delivery, removing the message.
    async fn acknowledge(
        &self,
        queue: &QueueRef,
        message_id: &str,
        lock_id: &str,
    ) -> RemoteResult<()>;

    /// Negatively acknowledge a delivery.
    async fn reject(
        &self,
        queue: &QueueRef,
        message_id: &str,
        lock_id: &str,
        reason: FailureReason,
        allow_redelivery: bool,
    ) -> RemoteResult<()>;

    /// View up to `count` of the most urgent messages without consuming them.
    ///
    /// `wait_hint_ms` lets the service hold the request open while the queue is empty.
    async fn peek(
        &self,
        queue: &QueueRef,
        count: u32,
        wait_hint_ms: u64,
    ) -> RemoteResult<Vec<DeliveredMessage>>;

    /// Release the connection. Best effort; errors are swallowed by implementations.
    async fn close(&self);
}
