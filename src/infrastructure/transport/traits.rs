//! # Transport Port
//!
//! Port definition for delivering encoded requests to a service.
//!
//! # Examples
//!
//! ```ignore
//! use carrier_rate::infrastructure::transport::{OutboundRequest, Transport, TransportResult};
//!
//! #[derive(Debug)]
//! struct QueueTransport { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl Transport for QueueTransport {
//!     // ... implement required methods
//! }
//! ```

use super::error::TransportResult;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

/// An encoded request ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// Unique id of this send attempt.
    pub attempt_id: Uuid,
    /// Operation name.
    pub operation: String,
    /// Encoded payload.
    pub payload: JsonValue,
}

impl OutboundRequest {
    /// Creates a request with a fresh attempt id.
    #[must_use]
    pub fn new(operation: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            operation: operation.into(),
            payload,
        }
    }

    /// Replaces the attempt id.
    #[must_use]
    pub fn with_attempt_id(mut self, attempt_id: Uuid) -> Self {
        self.attempt_id = attempt_id;
        self
    }
}

/// Delivers requests and returns the raw reply document.
///
/// Implementations report only delivery problems. A reply the service
/// produced, including one that rejects the request, is returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Returns the endpoint this transport delivers to.
    fn endpoint(&self) -> &str;

    /// Delivers a request and returns the decoded JSON reply.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the request cannot be delivered or the
    /// reply cannot be decoded.
    async fn call(&self, request: &OutboundRequest) -> TransportResult<JsonValue>;
}
