//! # Notification
//!
//! One coded message attached to a service reply.

use super::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A coded message returned by the service.
///
/// Notifications are immutable; a reply carries them in the order the
/// service emitted them.
///
/// # Examples
///
/// ```
/// use carrier_rate::domain::value_objects::{Notification, Severity};
///
/// let note = Notification::new(Severity::Warning, "556", "Service type is not valid for origin");
/// assert_eq!(note.code(), "556");
/// assert!(note.to_string().contains("WARNING"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    /// Severity of this notification.
    severity: Severity,
    /// Component that raised the notification, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    /// Service-defined code.
    #[serde(default)]
    code: String,
    /// Human-readable message.
    #[serde(default)]
    message: String,
}

impl Notification {
    /// Creates a notification.
    #[must_use]
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            source: None,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Sets the source component.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the severity.
    #[inline]
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the source component.
    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the code.
    #[inline]
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}
