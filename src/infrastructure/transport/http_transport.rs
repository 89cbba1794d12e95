//! # HTTP Transport
//!
//! Delivers requests as `POST {base_url}/{operation}` with a JSON body.

use super::error::{TransportError, TransportResult};
use super::http_client::HttpClient;
use super::traits::{OutboundRequest, Transport};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Header carrying the attempt id of each send.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// [`Transport`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Internal` if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> TransportResult<Self> {
        Ok(Self::with_client(base_url, HttpClient::new(timeout_ms)?))
    }

    /// Creates a transport over an existing client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: HttpClient) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Returns the URL an operation is posted to.
    #[must_use]
    pub fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn call(&self, request: &OutboundRequest) -> TransportResult<JsonValue> {
        let url = self.operation_url(&request.operation);
        let mut headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(&request.attempt_id.to_string())
            .map_err(|e| TransportError::internal(format!("Invalid request id: {}", e)))?;
        headers.insert(REQUEST_ID_HEADER, request_id);

        debug!(url = %url, attempt_id = %request.attempt_id, "posting request");
        self.client.post_json(&url, &request.payload, headers).await
    }
}
