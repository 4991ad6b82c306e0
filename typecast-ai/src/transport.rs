//! The transport boundary.
//!
//! A [`Transport`] takes a composed [`RenderedRequest`] and returns the
//! provider's raw reply. Serializing the request into a concrete provider's
//! wire format (chat-completion with a forced tool call, native JSON mode,
//! and so on) is entirely the implementor's concern; this crate ships only
//! the seam and a mock for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use typecast_ai_core::errors::TransportError;
use typecast_ai_core::request::{RawReply, RenderedRequest};
use typecast_ai_core::settings::CallConfig;

/// An external LLM transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name, for logging.
    fn name(&self) -> &str;

    /// Execute one request and return the raw reply.
    ///
    /// Timeouts and provider-level retries are this implementor's concern;
    /// the pipeline never reinterprets a [`TransportError`].
    async fn execute(
        &self,
        request: &RenderedRequest,
        config: &CallConfig,
    ) -> Result<RawReply, TransportError>;
}

#[derive(Debug)]
struct QueuedReply {
    result: Result<RawReply, TransportError>,
    delay: Option<Duration>,
}

/// A mock transport for testing with pre-configured replies.
///
/// Replies are returned in queue order; each may carry an artificial delay
/// so tests can force out-of-order completion of concurrent calls. Every
/// executed request is recorded.
///
/// # Example
///
/// ```rust
/// use typecast_ai::transport::MockTransport;
///
/// let transport = MockTransport::new()
///     .with_structured(serde_json::json!({"data": 42}))
///     .with_text("free text reply");
/// assert_eq!(transport.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<Vec<QueuedReply>>>,
    requests: Arc<Mutex<Vec<RenderedRequest>>>,
}

impl MockTransport {
    /// Create a mock with an empty reply queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, result: Result<RawReply, TransportError>, delay: Option<Duration>) -> Self {
        self.replies.lock().push(QueuedReply { result, delay });
        self
    }

    /// Queue a reply.
    #[must_use]
    pub fn with_reply(self, reply: RawReply) -> Self {
        self.push(Ok(reply), None)
    }

    /// Queue a structured reply.
    #[must_use]
    pub fn with_structured(self, value: serde_json::Value) -> Self {
        self.push(Ok(RawReply::structured(value)), None)
    }

    /// Queue a text reply.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(RawReply::text(text)), None)
    }

    /// Queue a transport failure.
    #[must_use]
    pub fn with_error(self, error: TransportError) -> Self {
        self.push(Err(error), None)
    }

    /// Queue a reply that resolves only after `delay`.
    #[must_use]
    pub fn with_delayed_reply(self, reply: RawReply, delay: Duration) -> Self {
        self.push(Ok(reply), Some(delay))
    }

    /// Every request executed so far, in execution order.
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<RenderedRequest> {
        self.requests.lock().clone()
    }

    /// How many times `execute` was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(
        &self,
        request: &RenderedRequest,
        _config: &CallConfig,
    ) -> Result<RawReply, TransportError> {
        self.requests.lock().push(request.clone());

        let queued = {
            let mut replies = self.replies.lock();
            if replies.is_empty() {
                None
            } else {
                Some(replies.remove(0))
            }
        };

        match queued {
            Some(QueuedReply { result, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(RawReply::text("mock reply")),
        }
    }
}
