//! # Transport Invoker
//!
//! Encodes an envelope, calls the transport under an optional timeout and
//! decodes the reply. No retries; every invocation is one attempt.

use super::codec::{decode_reply, encode_request};
use super::error::{TransportError, TransportResult};
use super::traits::{OutboundRequest, Transport};
use crate::domain::envelope::{ReplyTree, RequestEnvelope};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Sends envelopes through a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportInvoker {
    transport: Arc<dyn Transport>,
    timeout: Option<Duration>,
}

impl TransportInvoker {
    /// Creates an invoker without a caller-side timeout.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    /// Bounds every call by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the configured timeout.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Sends one envelope and returns the decoded reply tree.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Timeout` when the timeout elapses and any
    /// error the transport or the codec reports.
    pub async fn invoke(
        &self,
        envelope: &RequestEnvelope,
        output_type: &str,
        attempt_id: Uuid,
    ) -> TransportResult<ReplyTree> {
        let payload = encode_request(envelope)?;
        let request =
            OutboundRequest::new(envelope.operation(), payload).with_attempt_id(attempt_id);

        debug!(
            endpoint = self.transport.endpoint(),
            operation = %request.operation,
            "invoking transport"
        );

        let reply = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.transport.call(&request))
                .await
                .map_err(|_| {
                    TransportError::timeout_with_duration(
                        format!("no reply to {} within {:?}", request.operation, limit),
                        u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    )
                })??,
            None => self.transport.call(&request).await?,
        };

        Ok(decode_reply(output_type, reply))
    }
}
