//! reqwest-backed implementation of [`QueueService`].

use async_trait::async_trait;
use kokaq_config::ShellConfig;
use kokaq_core::{
    DeliveredMessage, FailureReason, MessageReceipt, NamespaceInfo, QueueInfo, QueueRef,
    QueueService, RemoteError, RemoteResult,
};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::problem::{classify_problem, transport_error};
use crate::wire::{
    AckRequest, CreateRequest, MessageBatch, NackRequest, NamespaceList, PeekRequest, QueueList,
    ReceiveRequest, SendRequest,
};

/// Header carrying the per-session request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

const API_PREFIX: &str = "v1";

/// Queue-service client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpQueueService {
    client: Client,
    base_url: Url,
}

impl HttpQueueService {
    /// Build a client from validated settings without contacting the service.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the HTTP client cannot be constructed.
    pub fn new(config: &ShellConfig, request_id: &str) -> RemoteResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(request_id).map_err(|_| {
            RemoteError::connection("request identifier contains invalid characters")
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .connect_timeout(config.dial_timeout)
            .timeout(config.request_timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|err| {
                RemoteError::connection(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            base_url: config.address.clone(),
        })
    }

    /// Build a client and verify the service answers its health probe.
    ///
    /// # Errors
    ///
    /// Returns the classified probe failure when the service is unreachable.
    pub async fn connect(config: &ShellConfig) -> RemoteResult<Self> {
        let request_id = Uuid::new_v4().to_string();
        let service = Self::new(config, &request_id)?;
        service.ping().await?;
        debug!(address = %service.base_url, request_id = %request_id, "connected to queue service");
        Ok(service)
    }

    fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| RemoteError::protocol("base URL cannot carry a path"))?;
            path.pop_if_empty().push(API_PREFIX).extend(segments);
        }
        Ok(url)
    }

    fn queue_endpoint(&self, queue: &QueueRef, tail: &[&str]) -> RemoteResult<Url> {
        let mut segments = vec![
            "namespaces",
            queue.namespace.as_str(),
            "queues",
            queue.queue.as_str(),
        ];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> RemoteResult<T> {
        let response = self.dispatch(operation, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| transport_error(operation, &err))
    }

    async fn execute_empty(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> RemoteResult<()> {
        self.dispatch(operation, request).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> RemoteResult<reqwest::Response> {
        debug!(operation, "sending queue service request");
        let response = request
            .send()
            .await
            .map_err(|err| transport_error(operation, &err))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(classify_problem(response).await)
        }
    }
}

#[async_trait]
impl QueueService for HttpQueueService {
    async fn ping(&self) -> RemoteResult<()> {
        let url = self.endpoint(&["health"])?;
        self.execute_empty("ping", self.client.get(url)).await
    }

    async fn create_namespace(&self, name: &str) -> RemoteResult<NamespaceInfo> {
        let url = self.endpoint(&["namespaces"])?;
        let request = self.client.post(url).json(&CreateRequest { name });
        self.execute("namespace.create", request).await
    }

    async fn resolve_namespace(&self, name: &str) -> RemoteResult<NamespaceInfo> {
        let url = self.endpoint(&["namespaces", name])?;
        self.execute("namespace.resolve", self.client.get(url)).await
    }

    async fn delete_namespace(&self, name: &str) -> RemoteResult<()> {
        let url = self.endpoint(&["namespaces", name])?;
        self.execute_empty("namespace.delete", self.client.delete(url)).await
    }

    async fn list_namespaces(&self) -> RemoteResult<Vec<String>> {
        let url = self.endpoint(&["namespaces"])?;
        let list: NamespaceList = self.execute("namespace.list", self.client.get(url)).await?;
        Ok(list.namespaces)
    }

    async fn create_queue(&self, queue: &QueueRef) -> RemoteResult<QueueInfo> {
        let url = self.endpoint(&["namespaces", &queue.namespace, "queues"])?;
        let request = self.client.post(url).json(&CreateRequest { name: &queue.queue });
        self.execute("queue.create", request).await
    }

    async fn resolve_queue(&self, queue: &QueueRef) -> RemoteResult<QueueInfo> {
        let url = self.queue_endpoint(queue, &[])?;
        self.execute("queue.resolve", self.client.get(url)).await
    }

    async fn delete_queue(&self, queue: &QueueRef) -> RemoteResult<()> {
        let url = self.queue_endpoint(queue, &[])?;
        self.execute_empty("queue.delete", self.client.delete(url)).await
    }

    async fn list_queues(&self, namespace: &str) -> RemoteResult<Vec<String>> {
        let url = self.endpoint(&["namespaces", namespace, "queues"])?;
        let list: QueueList = self.execute("queue.list", self.client.get(url)).await?;
        Ok(list.queues)
    }

    async fn send(
        &self,
        queue: &QueueRef,
        body: &[u8],
        priority: u64,
    ) -> RemoteResult<MessageReceipt> {
        let url = self.queue_endpoint(queue, &["messages"])?;
        let request = self.client.post(url).json(&SendRequest::new(body, priority));
        self.execute("message.send", request).await
    }

    async fn receive(
        &self,
        queue: &QueueRef,
        batch_size: u32,
    ) -> RemoteResult<Vec<DeliveredMessage>> {
        let url = self.queue_endpoint(queue, &["messages", "receive"])?;
        let request = self.client.post(url).json(&ReceiveRequest { batch_size });
        let batch: MessageBatch = self.execute("message.receive", request).await?;
        batch.into_messages()
    }

    async fn acknowledge(
        &self,
        queue: &QueueRef,
        message_id: &str,
        lock_id: &str,
    ) -> RemoteResult<()> {
        let url = self.queue_endpoint(queue, &["messages", message_id, "ack"])?;
        let request = self.client.post(url).json(&AckRequest { lock_id });
        self.execute_empty("message.ack", request).await
    }

    async fn reject(
        &self,
        queue: &QueueRef,
        message_id: &str,
        lock_id: &str,
        reason: FailureReason,
        allow_redelivery: bool,
    ) -> RemoteResult<()> {
        let url = self.queue_endpoint(queue, &["messages", message_id, "nack"])?;
        let request = self.client.post(url).json(&NackRequest {
            lock_id,
            reason,
            allow_redelivery,
        });
        self.execute_empty("message.nack", request).await
    }

    async fn peek(
        &self,
        queue: &QueueRef,
        count: u32,
        wait_hint_ms: u64,
    ) -> RemoteResult<Vec<DeliveredMessage>> {
        let url = self.queue_endpoint(queue, &["messages", "peek"])?;
        let request = self.client.post(url).json(&PeekRequest {
            count,
            wait_ms: wait_hint_ms,
        });
        let batch: MessageBatch = self.execute("message.peek", request).await?;
        batch.into_messages()
    }

    async fn close(&self) {
        // reqwest releases pooled connections when the last client handle drops.
        debug!(address = %self.base_url, "closing queue service connection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use kokaq_config::RawShellConfig;
    use kokaq_core::RemoteErrorKind;
    use serde_json::json;

    fn config_for(address: &str) -> ShellConfig {
        ShellConfig::from_raw(&RawShellConfig {
            address: address.to_string(),
            dial_timeout_secs: 1,
            request_timeout_secs: 2,
            tls_enabled: false,
        })
        .expect("test config should validate")
    }

    fn service_for(server: &MockServer) -> HttpQueueService {
        HttpQueueService::new(&config_for(&server.base_url()), "trace-1")
            .expect("client should build")
    }

    fn orders() -> QueueRef {
        QueueRef::new("acct", "orders")
    }

    #[tokio::test]
    async fn connect_probes_health_endpoint() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/health");
            then.status(204);
        });

        HttpQueueService::connect(&config_for(&server.base_url()))
            .await
            .expect("connect should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn connect_reports_unreachable_service() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let err = HttpQueueService::connect(&config_for(&format!("127.0.0.1:{port}")))
            .await
            .expect_err("nothing listens on the probe port");
        assert_eq!(err.kind, RemoteErrorKind::Connection);
    }

    #[tokio::test]
    async fn requests_carry_request_id() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/namespaces")
                .header(HEADER_REQUEST_ID, "trace-1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"namespaces": ["acct", "billing"]}));
        });

        let names = service_for(&server)
            .list_namespaces()
            .await
            .expect("list should succeed");
        assert_eq!(names, vec!["acct".to_string(), "billing".to_string()]);
        mock.assert();
    }

    #[tokio::test]
    async fn create_namespace_posts_name() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/namespaces")
                .json_body(json!({"name": "acct"}));
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({"name": "acct"}));
        });

        let info = service_for(&server)
            .create_namespace("acct")
            .await
            .expect("create should succeed");
        assert_eq!(info.name, "acct");
        mock.assert();
    }

    #[tokio::test]
    async fn resolve_queue_maps_missing_queue() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v1/namespaces/acct/queues/orders");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({
                    "title": "not found",
                    "detail": "queue 'orders' does not exist"
                }));
        });

        let err = service_for(&server)
            .resolve_queue(&orders())
            .await
            .expect_err("queue is missing");
        assert_eq!(err.kind, RemoteErrorKind::NotFound);
        assert_eq!(err.message, "queue 'orders' does not exist");
    }

    #[tokio::test]
    async fn send_encodes_body_and_priority() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/namespaces/acct/queues/orders/messages")
                .json_body(json!({"body_b64": "cGF5IGludm9pY2U=", "priority": 5}));
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({"message_id": "m-1"}));
        });

        let receipt = service_for(&server)
            .send(&orders(), b"pay invoice", 5)
            .await
            .expect("send should succeed");
        assert_eq!(receipt.message_id, "m-1");
        mock.assert();
    }

    #[tokio::test]
    async fn receive_requests_batch_and_decodes_messages() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/namespaces/acct/queues/orders/messages/receive")
                .json_body(json!({"batch_size": 1}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"messages": [
                    {"message_id": "m-1", "lock_id": "l-1", "priority": 7, "body_b64": "aGk="}
                ]}));
        });

        let messages = service_for(&server)
            .receive(&orders(), 1)
            .await
            .expect("receive should succeed");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].lock_id, "l-1");
        assert_eq!(messages[0].body_text(), "hi");
        mock.assert();
    }

    #[tokio::test]
    async fn reject_sends_reason_and_redelivery_flag() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/namespaces/acct/queues/orders/messages/m-1/nack")
                .json_body(json!({
                    "lock_id": "l-1",
                    "reason": "PROCESSING_ERROR",
                    "allow_redelivery": true
                }));
            then.status(204);
        });

        service_for(&server)
            .reject(&orders(), "m-1", "l-1", FailureReason::ProcessingError, true)
            .await
            .expect("nack should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn conflicting_create_is_classified() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/v1/namespaces/acct/queues");
            then.status(409).body("queue already exists");
        });

        let err = service_for(&server)
            .create_queue(&orders())
            .await
            .expect_err("queue exists");
        assert_eq!(err.kind, RemoteErrorKind::Conflict);
        assert_eq!(err.to_string(), "conflict: queue already exists");
    }

    #[tokio::test]
    async fn peek_sends_count_and_wait_hint() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/namespaces/acct/queues/orders/messages/peek")
                .json_body(json!({"count": 2, "wait_ms": 250}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"messages": []}));
        });

        let messages = service_for(&server)
            .peek(&orders(), 2, 250)
            .await
            .expect("peek should succeed");
        assert!(messages.is_empty());
        mock.assert();
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let service = HttpQueueService::new(&config_for("http://gateway.local/kokaq"), "trace")
            .expect("client should build");
        let url = service
            .endpoint(&["namespaces", "a b"])
            .expect("endpoint should build");
        assert_eq!(url.as_str(), "http://gateway.local/kokaq/v1/namespaces/a%20b");
    }
}
