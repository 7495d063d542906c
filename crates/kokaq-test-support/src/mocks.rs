//! In-memory queue service that records every call it receives.
//!
//! # Design
//! - Behaves like a small Kokaq deployment: namespaces own queues, queues hold
//!   messages ordered by priority (higher first, FIFO within a priority).
//! - Every facade call is appended to a log before it is evaluated so tests can
//!   assert both on outcomes and on the absence of remote traffic.
//! - `fail_next` injects one classified failure for the following call.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use kokaq_core::{
    DeliveredMessage, FailureReason, MessageReceipt, NamespaceInfo, QueueInfo, QueueRef,
    QueueService, RemoteError, RemoteResult,
};

/// One facade call as observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Call {
    Ping,
    CreateNamespace(String),
    ResolveNamespace(String),
    DeleteNamespace(String),
    ListNamespaces,
    CreateQueue(QueueRef),
    ResolveQueue(QueueRef),
    DeleteQueue(QueueRef),
    ListQueues(String),
    Send {
        queue: QueueRef,
        body: Vec<u8>,
        priority: u64,
    },
    Receive {
        queue: QueueRef,
        batch_size: u32,
    },
    Acknowledge {
        queue: QueueRef,
        message_id: String,
        lock_id: String,
    },
    Reject {
        queue: QueueRef,
        message_id: String,
        lock_id: String,
        reason: FailureReason,
        allow_redelivery: bool,
    },
    Peek {
        queue: QueueRef,
        count: u32,
        wait_hint_ms: u64,
    },
    Close,
}

#[derive(Debug)]
struct StoredMessage {
    id: String,
    priority: u64,
    body: Vec<u8>,
    lock: Option<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    namespaces: BTreeMap<String, BTreeMap<String, Vec<StoredMessage>>>,
    calls: Vec<Call>,
    next_failure: Option<RemoteError>,
    next_message: u64,
    next_lock: u64,
}

impl FakeState {
    fn queue_mut(&mut self, queue: &QueueRef) -> RemoteResult<&mut Vec<StoredMessage>> {
        self.namespaces
            .get_mut(&queue.namespace)
            .ok_or_else(|| {
                RemoteError::not_found(format!("namespace '{}' does not exist", queue.namespace))
            })?
            .get_mut(&queue.queue)
            .ok_or_else(|| RemoteError::not_found(format!("queue '{queue}' does not exist")))
    }

    fn locked_message(
        &mut self,
        queue: &QueueRef,
        message_id: &str,
        lock_id: &str,
    ) -> RemoteResult<usize> {
        let messages = self.queue_mut(queue)?;
        let index = messages
            .iter()
            .position(|message| message.id == message_id)
            .ok_or_else(|| RemoteError::not_found(format!("message '{message_id}' not found")))?;
        if messages[index].lock.as_deref() == Some(lock_id) {
            Ok(index)
        } else {
            Err(RemoteError::conflict(format!(
                "lock '{lock_id}' does not hold message '{message_id}'"
            )))
        }
    }
}

/// Indices of unlocked messages, most urgent first.
fn deliverable(messages: &[StoredMessage], limit: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = messages
        .iter()
        .enumerate()
        .filter(|(_, message)| message.lock.is_none())
        .map(|(index, _)| index)
        .collect();
    indices.sort_by(|a, b| messages[*b].priority.cmp(&messages[*a].priority).then(a.cmp(b)));
    indices.truncate(limit);
    indices
}

/// Queue service fake backed by in-process maps.
#[derive(Debug, Default)]
pub struct RecordingQueueService {
    state: Mutex<FakeState>,
}

impl RecordingQueueService {
    /// Create an empty deployment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a namespace.
    #[must_use]
    pub fn with_namespace(self, name: &str) -> Self {
        self.lock()
            .namespaces
            .entry(name.to_string())
            .or_default();
        self
    }

    /// Seed a queue (and its namespace).
    #[must_use]
    pub fn with_queue(self, namespace: &str, queue: &str) -> Self {
        self.lock()
            .namespaces
            .entry(namespace.to_string())
            .or_default()
            .entry(queue.to_string())
            .or_default();
        self
    }

    /// Make the next call fail with `error`, after it has been recorded.
    pub fn fail_next(&self, error: RemoteError) {
        self.lock().next_failure = Some(error);
    }

    /// Calls observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of messages currently stored in `queue`, locked or not.
    #[must_use]
    pub fn depth(&self, queue: &QueueRef) -> usize {
        self.lock()
            .namespaces
            .get(&queue.namespace)
            .and_then(|queues| queues.get(&queue.queue))
            .map_or(0, Vec::len)
    }

    /// Whether a namespace exists.
    #[must_use]
    pub fn has_namespace(&self, name: &str) -> bool {
        self.lock().namespaces.contains_key(name)
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, call: Call) -> RemoteResult<MutexGuard<'_, FakeState>> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.next_failure.take() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl QueueService for RecordingQueueService {
    async fn ping(&self) -> RemoteResult<()> {
        self.begin(Call::Ping).map(|_| ())
    }

    async fn create_namespace(&self, name: &str) -> RemoteResult<NamespaceInfo> {
        let mut state = self.begin(Call::CreateNamespace(name.to_string()))?;
        if state.namespaces.contains_key(name) {
            return Err(RemoteError::conflict(format!(
                "namespace '{name}' already exists"
            )));
        }
        state.namespaces.insert(name.to_string(), BTreeMap::new());
        Ok(NamespaceInfo {
            name: name.to_string(),
        })
    }

    async fn resolve_namespace(&self, name: &str) -> RemoteResult<NamespaceInfo> {
        let state = self.begin(Call::ResolveNamespace(name.to_string()))?;
        if state.namespaces.contains_key(name) {
            Ok(NamespaceInfo {
                name: name.to_string(),
            })
        } else {
            Err(RemoteError::not_found(format!(
                "namespace '{name}' does not exist"
            )))
        }
    }

    async fn delete_namespace(&self, name: &str) -> RemoteResult<()> {
        let mut state = self.begin(Call::DeleteNamespace(name.to_string()))?;
        state
            .namespaces
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found(format!("namespace '{name}' does not exist")))
    }

    async fn list_namespaces(&self) -> RemoteResult<Vec<String>> {
        let state = self.begin(Call::ListNamespaces)?;
        Ok(state.namespaces.keys().cloned().collect())
    }

    async fn create_queue(&self, queue: &QueueRef) -> RemoteResult<QueueInfo> {
        let mut state = self.begin(Call::CreateQueue(queue.clone()))?;
        let queues = state.namespaces.get_mut(&queue.namespace).ok_or_else(|| {
            RemoteError::not_found(format!("namespace '{}' does not exist", queue.namespace))
        })?;
        if queues.contains_key(&queue.queue) {
            return Err(RemoteError::conflict(format!(
                "queue '{queue}' already exists"
            )));
        }
        queues.insert(queue.queue.clone(), Vec::new());
        Ok(QueueInfo {
            namespace: queue.namespace.clone(),
            name: queue.queue.clone(),
        })
    }

    async fn resolve_queue(&self, queue: &QueueRef) -> RemoteResult<QueueInfo> {
        let mut state = self.begin(Call::ResolveQueue(queue.clone()))?;
        state.queue_mut(queue)?;
        Ok(QueueInfo {
            namespace: queue.namespace.clone(),
            name: queue.queue.clone(),
        })
    }

    async fn delete_queue(&self, queue: &QueueRef) -> RemoteResult<()> {
        let mut state = self.begin(Call::DeleteQueue(queue.clone()))?;
        state
            .namespaces
            .get_mut(&queue.namespace)
            .and_then(|queues| queues.remove(&queue.queue))
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found(format!("queue '{queue}' does not exist")))
    }

    async fn list_queues(&self, namespace: &str) -> RemoteResult<Vec<String>> {
        let state = self.begin(Call::ListQueues(namespace.to_string()))?;
        state
            .namespaces
            .get(namespace)
            .map(|queues| queues.keys().cloned().collect())
            .ok_or_else(|| {
                RemoteError::not_found(format!("namespace '{namespace}' does not exist"))
            })
    }

    async fn send(
        &self,
        queue: &QueueRef,
        body: &[u8],
        priority: u64,
    ) -> RemoteResult<MessageReceipt> {
        let mut state = self.begin(Call::Send {
            queue: queue.clone(),
            body: body.to_vec(),
            priority,
        })?;
        state.queue_mut(queue)?;
        state.next_message += 1;
        let id = format!("m-{}", state.next_message);
        state.queue_mut(queue)?.push(StoredMessage {
            id: id.clone(),
            priority,
            body: body.to_vec(),
            lock: None,
        });
        Ok(MessageReceipt {
            message_id: id,
            lock_id: None,
        })
    }

    async fn receive(
        &self,
        queue: &QueueRef,
        batch_size: u32,
    ) -> RemoteResult<Vec<DeliveredMessage>> {
        let mut state = self.begin(Call::Receive {
            queue: queue.clone(),
            batch_size,
        })?;
        let limit = usize::try_from(batch_size).unwrap_or(usize::MAX);
        let picked = deliverable(state.queue_mut(queue)?, limit);

        let mut delivered = Vec::with_capacity(picked.len());
        for index in picked {
            state.next_lock += 1;
            let lock_id = format!("l-{}", state.next_lock);
            let message = &mut state.queue_mut(queue)?[index];
            message.lock = Some(lock_id.clone());
            delivered.push(DeliveredMessage {
                message_id: message.id.clone(),
                lock_id,
                priority: message.priority,
                body: message.body.clone(),
            });
        }
        Ok(delivered)
    }

    async fn acknowledge(
        &self,
        queue: &QueueRef,
        message_id: &str,
        lock_id: &str,
    ) -> RemoteResult<()> {
        let mut state = self.begin(Call::Acknowledge {
            queue: queue.clone(),
            message_id: message_id.to_string(),
            lock_id: lock_id.to_string(),
        })?;
        let index = state.locked_message(queue, message_id, lock_id)?;
        state.queue_mut(queue)?.remove(index);
        Ok(())
    }

    async fn reject(
        &self,
        queue: &QueueRef,
        message_id: &str,
        lock_id: &str,
        reason: FailureReason,
        allow_redelivery: bool,
    ) -> RemoteResult<()> {
        let mut state = self.begin(Call::Reject {
            queue: queue.clone(),
            message_id: message_id.to_string(),
            lock_id: lock_id.to_string(),
            reason,
            allow_redelivery,
        })?;
        let index = state.locked_message(queue, message_id, lock_id)?;
        let messages = state.queue_mut(queue)?;
        if allow_redelivery {
            messages[index].lock = None;
        } else {
            messages.remove(index);
        }
        Ok(())
    }

    async fn peek(
        &self,
        queue: &QueueRef,
        count: u32,
        wait_hint_ms: u64,
    ) -> RemoteResult<Vec<DeliveredMessage>> {
        let mut state = self.begin(Call::Peek {
            queue: queue.clone(),
            count,
            wait_hint_ms,
        })?;
        let limit = usize::try_from(count).unwrap_or(usize::MAX);
        let messages = state.queue_mut(queue)?;
        Ok(deliverable(messages.as_slice(), limit)
            .into_iter()
            .map(|index| {
                let message = &messages[index];
                DeliveredMessage {
                    message_id: message.id.clone(),
                    lock_id: String::new(),
                    priority: message.priority,
                    body: message.body.clone(),
                }
            })
            .collect())
    }

    async fn close(&self) {
        self.lock().calls.push(Call::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::orders_queue;
    use kokaq_core::RemoteErrorKind;

    #[tokio::test]
    async fn receive_prefers_higher_priority_then_arrival() {
        let fake = RecordingQueueService::new().with_queue("acct", "orders");
        let queue = orders_queue();
        fake.send(&queue, b"low", 1).await.expect("send low");
        fake.send(&queue, b"high-a", 9).await.expect("send high a");
        fake.send(&queue, b"high-b", 9).await.expect("send high b");

        let first = fake.receive(&queue, 1).await.expect("receive");
        assert_eq!(first[0].body, b"high-a");
        let rest = fake.receive(&queue, 5).await.expect("receive rest");
        let bodies: Vec<_> = rest.iter().map(|m| m.body_text().into_owned()).collect();
        assert_eq!(bodies, vec!["high-b".to_string(), "low".to_string()]);
    }

    #[tokio::test]
    async fn ack_requires_matching_lock() {
        let fake = RecordingQueueService::new().with_queue("acct", "orders");
        let queue = orders_queue();
        fake.send(&queue, b"job", 3).await.expect("send");
        let delivered = fake.receive(&queue, 1).await.expect("receive");

        let err = fake
            .acknowledge(&queue, &delivered[0].message_id, "l-999")
            .await
            .expect_err("wrong lock");
        assert_eq!(err.kind, RemoteErrorKind::Conflict);

        fake.acknowledge(&queue, &delivered[0].message_id, &delivered[0].lock_id)
            .await
            .expect("ack with the delivery lock");
        assert_eq!(fake.depth(&queue), 0);
    }

    #[tokio::test]
    async fn nack_with_redelivery_unlocks_message() {
        let fake = RecordingQueueService::new().with_queue("acct", "orders");
        let queue = orders_queue();
        fake.send(&queue, b"job", 3).await.expect("send");
        let delivered = fake.receive(&queue, 1).await.expect("receive");
        assert!(fake.peek(&queue, 1, 0).await.expect("peek").is_empty());

        fake.reject(
            &queue,
            &delivered[0].message_id,
            &delivered[0].lock_id,
            FailureReason::ProcessingError,
            true,
        )
        .await
        .expect("nack");
        let visible = fake.peek(&queue, 1, 0).await.expect("peek");
        assert_eq!(visible[0].message_id, delivered[0].message_id);
    }

    #[tokio::test]
    async fn injected_failure_is_recorded_and_returned_once() {
        let fake = RecordingQueueService::new();
        fake.fail_next(RemoteError::connection("link down"));
        let err = fake.list_namespaces().await.expect_err("injected failure");
        assert_eq!(err.kind, RemoteErrorKind::Connection);
        assert!(fake.list_namespaces().await.is_ok());
        assert_eq!(fake.calls(), vec![Call::ListNamespaces, Call::ListNamespaces]);
    }

    #[tokio::test]
    async fn queues_require_their_namespace() {
        let fake = RecordingQueueService::new();
        let err = fake
            .create_queue(&orders_queue())
            .await
            .expect_err("namespace missing");
        assert_eq!(err.kind, RemoteErrorKind::NotFound);
        assert!(!fake.has_namespace("acct"));
    }
}
