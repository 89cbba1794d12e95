//! # Client Errors
//!
//! Error type surfaced to callers of the request builders.
//!
//! # Error Hierarchy
//!
//! ```text
//! ClientError
//! ├── Contract(ContractError)    - unknown names, shape mismatches, bad contracts
//! ├── Transport(TransportError)  - delivery failures, timeouts, undecodable replies
//! ├── IncompleteRequest          - a required field was left unset
//! ├── ServiceRejected            - the service answered at or above the failure threshold
//! └── Configuration              - unusable configuration
//! ```
//!
//! # Examples
//!
//! ```
//! use carrier_rate::application::error::ClientError;
//! use carrier_rate::domain::value_objects::{Notification, Severity};
//! use carrier_rate::infrastructure::transport::TransportError;
//!
//! let err: ClientError = TransportError::timeout("no reply").into();
//! assert!(err.is_timeout());
//!
//! let err = ClientError::service_rejected(
//!     Severity::Failure,
//!     vec![Notification::new(Severity::Failure, "1000", "Authentication Failed")],
//! );
//! assert_eq!(err.primary_message(), Some("Authentication Failed"));
//! ```

use crate::domain::errors::ContractError;
use crate::domain::value_objects::{Notification, ParseSeverityError, Severity};
use crate::infrastructure::transport::TransportError;
use thiserror::Error;

/// Error returned by request builders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Contract-level error: unknown name or wrong shape.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    /// Delivery failed or the reply could not be decoded.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A required field was not populated.
    #[error("incomplete request: required field {field} is not set")]
    IncompleteRequest {
        /// Name of the first missing field.
        field: String,
    },

    /// The service answered at or above the failure threshold.
    #[error("service rejected request ({severity}): {}", summarize(.notifications))]
    ServiceRejected {
        /// Overall reply severity.
        severity: Severity,
        /// Notifications in reply order.
        notifications: Vec<Notification>,
    },

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn summarize(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "no notifications".to_string();
    }
    notifications
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    /// Creates an incomplete request error.
    #[must_use]
    pub fn incomplete_request(field: impl Into<String>) -> Self {
        Self::IncompleteRequest {
            field: field.into(),
        }
    }

    /// Creates a service rejection.
    #[must_use]
    pub fn service_rejected(severity: Severity, notifications: Vec<Notification>) -> Self {
        Self::ServiceRejected {
            severity,
            notifications,
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true for transport timeouts.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns true for any transport-level failure.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true for service rejections.
    #[must_use]
    pub fn is_service_rejected(&self) -> bool {
        matches!(self, Self::ServiceRejected { .. })
    }

    /// Returns true if sending again may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_retryable())
    }

    /// Returns the notifications of a service rejection; empty otherwise.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        match self {
            Self::ServiceRejected { notifications, .. } => notifications,
            _ => &[],
        }
    }

    /// Returns the message of the most severe notification of a rejection.
    ///
    /// Ties go to the earliest notification.
    #[must_use]
    pub fn primary_message(&self) -> Option<&str> {
        let notifications = self.notifications();
        let worst = notifications.iter().map(Notification::severity).max()?;
        notifications
            .iter()
            .find(|n| n.severity() == worst)
            .map(Notification::message)
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<ParseSeverityError> for ClientError {
    fn from(err: ParseSeverityError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
