//! # HTTP Client
//!
//! Thin reqwest wrapper shared by the HTTP transport and the contract loader.
//!
//! Maps reqwest failures and non-success statuses onto [`TransportError`].

use super::error::{TransportError, TransportResult};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client with a fixed request timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| TransportError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` for network failures and non-success statuses.
    pub async fn get_text(&self, url: &str) -> TransportResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let response = self.check_status(response).await?;
        response
            .text()
            .await
            .map_err(|e| TransportError::protocol(format!("Failed to read response: {}", e)))
    }

    /// Makes a POST request with a JSON body and custom headers, and
    /// deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` for network failures, non-success statuses
    /// and undecodable bodies.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> TransportResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let response = self.check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::protocol(format!("Failed to parse response: {}", e)))
    }

    async fn check_status(&self, response: Response) -> TransportResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let retry_after_ms = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &error_body, retry_after_ms))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            TransportError::connection(format!("Connection failed: {}", error))
        } else {
            TransportError::connection(format!("HTTP request failed: {}", error))
        }
    }

    fn map_status_error(
        &self,
        status: StatusCode,
        body: &str,
        retry_after_ms: Option<u64>,
    ) -> TransportError {
        match status {
            StatusCode::BAD_REQUEST => {
                TransportError::invalid_request(format!("Bad request: {}", body))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                TransportError::authentication(format!("Authentication failed: {}", body))
            }
            StatusCode::NOT_FOUND => {
                TransportError::protocol(format!("Resource not found: {}", body))
            }
            StatusCode::TOO_MANY_REQUESTS => match retry_after_ms {
                Some(ms) => TransportError::rate_limited_with_retry("Rate limit exceeded", ms),
                None => TransportError::rate_limited("Rate limit exceeded"),
            },
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                TransportError::timeout(format!("Server timed out ({}): {}", status, body))
            }
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE => {
                TransportError::connection(format!("Server error ({}): {}", status, body))
            }
            _ => TransportError::protocol(format!("HTTP error ({}): {}", status, body)),
        }
    }
}

/// Reads a `Retry-After` header given in delta-seconds.
///
/// HTTP-date values are ignored.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}
