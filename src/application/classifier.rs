//! # Response Classification
//!
//! Turns a decoded reply into a [`ResponseEnvelope`] or a rejection.
//!
//! The overall severity of a reply is the highest of its declared
//! `HighestSeverity` and the severities of all its `Notifications`. Replies
//! at or above the failure threshold become
//! [`ClientError::ServiceRejected`]; everything below is returned, warnings
//! included.

use super::error::{ClientError, ClientResult};
use crate::domain::envelope::{ReplyTree, ResponseEnvelope};
use crate::domain::value_objects::{Notification, Severity};
use crate::infrastructure::transport::TransportError;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

/// Reply field holding the declared overall severity.
pub const HIGHEST_SEVERITY_FIELD: &str = "HighestSeverity";

/// Reply field holding the notifications.
pub const NOTIFICATIONS_FIELD: &str = "Notifications";

/// Classifies replies against a failure threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseClassifier {
    failure_threshold: Severity,
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self::new(Severity::Error)
    }
}

impl ResponseClassifier {
    /// Creates a classifier rejecting replies at or above `failure_threshold`.
    #[must_use]
    pub fn new(failure_threshold: Severity) -> Self {
        Self { failure_threshold }
    }

    /// Returns the failure threshold.
    #[inline]
    #[must_use]
    pub fn failure_threshold(&self) -> Severity {
        self.failure_threshold
    }

    /// Classifies the reply to `operation`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ServiceRejected` when the reply severity meets
    /// the threshold, and `ClientError::Transport` with a protocol error when
    /// the reply is not an object or carries an unknown severity.
    pub fn classify(&self, operation: &str, reply: ReplyTree) -> ClientResult<ResponseEnvelope> {
        if !reply.is_object() {
            return Err(TransportError::protocol(format!(
                "reply to {} is not an object",
                operation
            ))
            .into());
        }

        let declared = match reply.get(HIGHEST_SEVERITY_FIELD) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(s)) => Some(s.parse::<Severity>().map_err(|e| {
                TransportError::protocol(format!("reply to {}: {}", operation, e))
            })?),
            Some(other) => {
                return Err(TransportError::protocol(format!(
                    "reply to {}: {} is not a string: {}",
                    operation, HIGHEST_SEVERITY_FIELD, other
                ))
                .into());
            }
        };

        let notifications = reply
            .items(NOTIFICATIONS_FIELD)
            .into_iter()
            .map(|value| parse_notification(operation, value))
            .collect::<Result<Vec<_>, _>>()?;

        let severity = Severity::highest(
            declared
                .into_iter()
                .chain(notifications.iter().map(Notification::severity)),
        );

        if severity.meets(self.failure_threshold) {
            warn!(
                operation,
                severity = %severity,
                notifications = notifications.len(),
                "service rejected request"
            );
            return Err(ClientError::service_rejected(severity, notifications));
        }

        if severity.meets(Severity::Note) {
            for notification in &notifications {
                warn!(operation, notification = %notification, "service notification");
            }
        }
        info!(operation, severity = %severity, "reply classified");

        Ok(ResponseEnvelope {
            operation: operation.to_string(),
            severity,
            notifications,
            result: reply,
        })
    }
}

fn parse_notification(operation: &str, value: &JsonValue) -> Result<Notification, TransportError> {
    Notification::deserialize(value).map_err(|e| {
        TransportError::protocol(format!("reply to {}: malformed notification: {}", operation, e))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn classify(reply: JsonValue) -> ClientResult<ResponseEnvelope> {
        ResponseClassifier::default().classify("getRates", ReplyTree::new(reply))
    }

    mod severity {
        use super::*;

        #[test]
        fn success() {
            let envelope = classify(json!({ "HighestSeverity": "SUCCESS" })).unwrap();
            assert_eq!(envelope.severity, Severity::Success);
            assert!(envelope.notifications.is_empty());
            assert!(envelope.is_success());
        }

        #[test]
        fn notes_and_warnings_aggregate_without_raising() {
            let envelope = classify(json!({
                "HighestSeverity": "SUCCESS",
                "Notifications": [
                    { "Severity": "NOTE", "Code": "1", "Message": "note" },
                    { "Severity": "WARNING", "Code": "2", "Message": "warning" }
                ]
            }))
            .unwrap();
            assert_eq!(envelope.severity, Severity::Warning);
            let codes: Vec<&str> = envelope.notifications.iter().map(Notification::code).collect();
            assert_eq!(codes, vec!["1", "2"]);
        }

        #[test]
        fn single_notification_object() {
            let envelope = classify(json!({
                "Notifications": {
                    "Severity": "NOTE", "Source": "crs", "Code": "819", "Message": "m"
                }
            }))
            .unwrap();
            assert_eq!(envelope.severity, Severity::Note);
            assert_eq!(envelope.notifications[0].source(), Some("crs"));
        }

        #[test]
        fn missing_severity_is_success() {
            let envelope = classify(json!({ "RateReplyDetails": [] })).unwrap();
            assert_eq!(envelope.severity, Severity::Success);
        }
    }

    mod rejection {
        use super::*;

        #[test]
        fn failure_is_rejected_with_notifications() {
            let err = classify(json!({
                "HighestSeverity": "FAILURE",
                "Notifications": [
                    { "Severity": "FAILURE", "Source": "prof", "Code": "1000",
                      "Message": "Authentication Failed" }
                ]
            }))
            .unwrap_err();
            assert_eq!(
                err,
                ClientError::service_rejected(
                    Severity::Failure,
                    vec![
                        Notification::new(Severity::Failure, "1000", "Authentication Failed")
                            .with_source("prof")
                    ],
                )
            );
        }

        #[test]
        fn notification_above_declared_severity_wins() {
            let err = classify(json!({
                "HighestSeverity": "WARNING",
                "Notifications": [ { "Severity": "ERROR", "Code": "3", "Message": "bad zip" } ]
            }))
            .unwrap_err();
            assert!(matches!(
                err,
                ClientError::ServiceRejected { severity: Severity::Error, .. }
            ));
        }

        #[test]
        fn threshold_is_configurable() {
            let classifier = ResponseClassifier::new(Severity::Warning);
            let err = classifier
                .classify("getRates", ReplyTree::new(json!({ "HighestSeverity": "WARNING" })))
                .unwrap_err();
            assert!(err.is_service_rejected());
        }
    }

    mod protocol {
        use super::*;

        #[test]
        fn unknown_severity() {
            let err = classify(json!({ "HighestSeverity": "CATASTROPHIC" })).unwrap_err();
            assert!(matches!(err, ClientError::Transport(TransportError::Protocol { .. })));
        }

        #[test]
        fn non_object_reply() {
            let err = classify(json!("<html>oops</html>")).unwrap_err();
            assert!(err.is_transport());
        }

        #[test]
        fn malformed_notification() {
            let err = classify(json!({ "Notifications": [ { "Severity": 3 } ] })).unwrap_err();
            assert!(err.is_transport());
        }
    }

    fn severity_strategy() -> impl Strategy<Value = Severity> {
        prop::sample::select(Severity::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn overall_severity_is_the_maximum(
            declared in severity_strategy(),
            listed in prop::collection::vec(severity_strategy(), 0..6),
        ) {
            let reply = json!({
                "HighestSeverity": declared.as_str(),
                "Notifications": listed
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        json!({ "Severity": s.as_str(), "Code": i.to_string(), "Message": "m" })
                    })
                    .collect::<Vec<_>>(),
            });
            let expected = listed.iter().copied().fold(declared, Severity::max);

            match classify(reply) {
                Ok(envelope) => {
                    prop_assert!(expected < Severity::Error);
                    prop_assert_eq!(envelope.severity, expected);
                    let codes: Vec<String> =
                        envelope.notifications.iter().map(|n| n.code().to_string()).collect();
                    let expected_codes: Vec<String> =
                        (0..listed.len()).map(|i| i.to_string()).collect();
                    prop_assert_eq!(codes, expected_codes);
                }
                Err(ClientError::ServiceRejected { severity, notifications }) => {
                    prop_assert!(expected >= Severity::Error);
                    prop_assert_eq!(severity, expected);
                    prop_assert_eq!(notifications.len(), listed.len());
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
