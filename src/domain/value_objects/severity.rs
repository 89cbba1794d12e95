//! # Severity
//!
//! Ordered outcome classification of a service reply.
//!
//! Severities are totally ordered from [`Severity::Success`] to
//! [`Severity::Failure`]; when several apply, the highest wins.
//!
//! # Examples
//!
//! ```
//! use carrier_rate::domain::value_objects::Severity;
//!
//! assert!(Severity::Warning > Severity::Note);
//! assert_eq!("ERROR".parse::<Severity>().unwrap(), Severity::Error);
//! assert_eq!(
//!     Severity::highest([Severity::Note, Severity::Warning, Severity::Success]),
//!     Severity::Warning
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a known severity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid severity: {0}")]
pub struct ParseSeverityError(pub String);

/// Severity of a service reply or notification.
///
/// Ordering follows the declaration order, so `max` picks the worst outcome.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Severity {
    /// The operation succeeded.
    #[default]
    Success = 0,
    /// Informational note.
    Note = 1,
    /// The operation succeeded with warnings.
    Warning = 2,
    /// The service rejected the request.
    Error = 3,
    /// The service failed to process the request.
    Failure = 4,
}

impl Severity {
    /// All severities from lowest to highest.
    pub const ALL: [Self; 5] = [
        Self::Success,
        Self::Note,
        Self::Warning,
        Self::Error,
        Self::Failure,
    ];

    /// Returns the wire name of the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Note => "NOTE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Failure => "FAILURE",
        }
    }

    /// Returns the highest severity in `severities`, or `Success` when empty.
    #[must_use]
    pub fn highest(severities: impl IntoIterator<Item = Self>) -> Self {
        severities.into_iter().max().unwrap_or_default()
    }

    /// Returns true if this severity meets or exceeds `threshold`.
    #[inline]
    #[must_use]
    pub fn meets(self, threshold: Self) -> bool {
        self >= threshold
    }

    /// Returns true for `Error` and `Failure`.
    #[inline]
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Failure)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SUCCESS" => Ok(Self::Success),
            "NOTE" => Ok(Self::Note),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "FAILURE" => Ok(Self::Failure),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}
