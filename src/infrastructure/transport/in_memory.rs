//! # Scripted Transport
//!
//! In-memory [`Transport`] that replays queued replies and records every
//! request it receives.
//!
//! # Examples
//!
//! ```
//! use carrier_rate::infrastructure::transport::{OutboundRequest, ScriptedTransport, Transport};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let transport = ScriptedTransport::new().with_reply(json!({ "HighestSeverity": "SUCCESS" }));
//!
//! let reply = transport.call(&OutboundRequest::new("getRates", json!({}))).await.unwrap();
//! assert_eq!(reply["HighestSeverity"], "SUCCESS");
//! assert_eq!(transport.call_count(), 1);
//! # });
//! ```

use super::error::{TransportError, TransportResult};
use super::traits::{OutboundRequest, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::time::Duration;

const SCRIPTED_ENDPOINT: &str = "scripted://in-memory";

/// Transport returning pre-scripted replies in order.
///
/// Once the script runs out every call fails with `TransportError::Internal`.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<TransportResult<JsonValue>>>,
    requests: Mutex<Vec<OutboundRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply.
    #[must_use]
    pub fn with_reply(self, reply: JsonValue) -> Self {
        self.push_reply(reply);
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_error(self, error: TransportError) -> Self {
        self.push_error(error);
        self
    }

    /// Delays every reply, for exercising timeouts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a reply.
    pub fn push_reply(&self, reply: JsonValue) {
        self.replies.lock().push_back(Ok(reply));
    }

    /// Queues a failure.
    pub fn push_error(&self, error: TransportError) {
        self.replies.lock().push_back(Err(error));
    }

    /// Returns the number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns a copy of every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().clone()
    }

    /// Returns the most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<OutboundRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn endpoint(&self) -> &str {
        SCRIPTED_ENDPOINT
    }

    async fn call(&self, request: &OutboundRequest) -> TransportResult<JsonValue> {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().pop_front();
        next.unwrap_or_else(|| {
            Err(TransportError::internal("scripted transport has no reply left"))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_in_order() {
        let transport = ScriptedTransport::new()
            .with_reply(json!({ "n": 1 }))
            .with_error(TransportError::connection("reset"));

        let first = transport.call(&OutboundRequest::new("op", json!({}))).await;
        let second = transport.call(&OutboundRequest::new("op", json!({}))).await;
        let third = transport.call(&OutboundRequest::new("op", json!({}))).await;

        assert_eq!(first.unwrap(), json!({ "n": 1 }));
        assert_eq!(second.unwrap_err(), TransportError::connection("reset"));
        assert!(matches!(third, Err(TransportError::Internal { .. })));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn records_requests() {
        let transport = ScriptedTransport::new().with_reply(json!({}));
        let request = OutboundRequest::new("getRates", json!({ "RateRequest": {} }));
        transport.call(&request).await.unwrap();
        assert_eq!(transport.last_request(), Some(request));
    }
}
