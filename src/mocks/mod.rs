//! Mock implementations for testing.
//!
//! Provides a scripted transport, a fixed-key auth provider and a manually
//! driven clock so the pipeline and admission controller can be exercised
//! without network access or real time passing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::auth::{AuthProvider, API_KEY_PARAM};
use crate::errors::BrawlhallaError;
use crate::resilience::Clock;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
    /// How long the transport stalls before answering.
    pub delay: Option<Duration>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        Self {
            status: 200,
            body: serde_json::to_vec(value).unwrap_or_default(),
            delay: None,
        }
    }

    /// Creates an error response in the provider's envelope.
    pub fn error(status: u16, message: &str) -> Self {
        let error = serde_json::json!({
            "error": {
                "code": status,
                "message": message
            }
        });

        Self {
            status,
            ..Self::json(&error)
        }
    }

    /// Creates a response with a raw body.
    pub fn raw(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    /// Creates a response with custom status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Delays the response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Response(MockResponse),
    ConnectionFailure(String),
    Timeout(Duration),
}

/// Mock HTTP transport for testing.
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.replies).push_back(MockReply::Response(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(MockResponse::error(status, message));
    }

    /// Queues a connection failure.
    pub fn queue_connection_failure(&self, message: &str) {
        lock(&self.replies).push_back(MockReply::ConnectionFailure(message.to_string()));
    }

    /// Queues a timeout reported by the transport itself.
    pub fn queue_timeout(&self, timeout: Duration) {
        lock(&self.replies).push_back(MockReply::Timeout(timeout));
    }

    /// Sets the response used once the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_reply(&self) -> MockReply {
        if let Some(reply) = lock(&self.replies).pop_front() {
            return reply;
        }

        MockReply::Response(
            lock(&self.default_response)
                .clone()
                .unwrap_or_else(|| MockResponse::error(500, "No mock response configured")),
        )
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);

        match self.next_reply() {
            MockReply::Response(response) => {
                if let Some(delay) = response.delay {
                    tokio::time::sleep(delay).await;
                }

                Ok(HttpResponse {
                    status: response.status,
                    body: response.body,
                })
            }
            MockReply::ConnectionFailure(message) => Err(TransportError::Connection { message }),
            MockReply::Timeout(timeout) => Err(TransportError::Timeout { timeout }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Mock auth provider with a fixed, unvalidated key.
pub struct MockAuth {
    api_key: String,
}

impl MockAuth {
    /// Creates a new mock auth provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new("mock_test_key")
    }
}

impl AuthProvider for MockAuth {
    fn apply_auth(&self, query: &mut Vec<(String, String)>) {
        query.push((API_KEY_PARAM.to_string(), self.api_key.clone()));
    }

    fn validate(&self) -> Result<(), BrawlhallaError> {
        Ok(())
    }
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth").finish()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    pub fn new(start: Duration) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(start.as_nanos() as u64)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Moves the clock backward, stopping at zero.
    pub fn rewind(&self, by: Duration) {
        let by = by.as_nanos() as u64;
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_sub(by))
            });
    }

    /// Sets the reading.
    pub fn set(&self, to: Duration) {
        self.nanos.store(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}
