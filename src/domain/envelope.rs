//! # Envelopes
//!
//! What travels with a request besides its body, and what comes back.
//!
//! A [`RequestEnvelope`] pairs the root [`TypedObject`] of one operation with
//! the [`EnvelopeMetadata`] every call carries: operation name,
//! authentication block, service version and an optional customer
//! transaction id. Replies are kept as a navigable [`ReplyTree`] and, once
//! classified, wrapped in a [`ResponseEnvelope`].

use super::contract::ServiceVersion;
use super::typed_object::TypedObject;
use super::value_objects::{Notification, Severity};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Web service credential pair.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Developer key.
    pub key: String,
    /// Developer password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(key: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("password", &"***")
            .finish()
    }
}

/// Account identification sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientDetail {
    /// Shipper account number.
    pub account_number: String,
    /// Meter number assigned to the account.
    pub meter_number: String,
    /// Integrator id, for certified integrators.
    #[serde(default)]
    pub integrator_id: Option<String>,
    /// Express region code (`US`, `CA`, `EMEA`, ...).
    #[serde(default)]
    pub region: Option<String>,
}

/// Credentials plus account identification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthenticationBlock {
    /// User credentials.
    pub credentials: Credentials,
    /// Account identification.
    pub client: ClientDetail,
}

/// Per-request metadata injected alongside the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeMetadata {
    /// Operation name.
    pub operation: String,
    /// Authentication block.
    pub authentication: AuthenticationBlock,
    /// Version block the service expects.
    pub version: Option<ServiceVersion>,
    /// Caller-chosen id echoed back by the service.
    pub customer_transaction_id: Option<String>,
}

impl EnvelopeMetadata {
    /// Creates metadata for an operation.
    #[must_use]
    pub fn new(
        operation: impl Into<String>,
        authentication: AuthenticationBlock,
        version: Option<ServiceVersion>,
    ) -> Self {
        Self {
            operation: operation.into(),
            authentication,
            version,
            customer_transaction_id: None,
        }
    }
}

/// Root request object plus metadata for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    /// Metadata.
    pub metadata: EnvelopeMetadata,
    /// Root request object.
    pub body: TypedObject,
}

impl RequestEnvelope {
    /// Creates an envelope.
    #[must_use]
    pub fn new(metadata: EnvelopeMetadata, body: TypedObject) -> Self {
        Self { metadata, body }
    }

    /// Returns the operation name.
    #[inline]
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.metadata.operation
    }
}

/// Navigable reply tree.
///
/// # Examples
///
/// ```
/// use carrier_rate::domain::envelope::ReplyTree;
/// use serde_json::json;
///
/// let reply = ReplyTree::new(json!({
///     "RateReplyDetails": { "ServiceType": "FEDEX_GROUND" }
/// }));
///
/// assert_eq!(reply.items("RateReplyDetails").len(), 1);
/// assert_eq!(
///     reply.get("RateReplyDetails.ServiceType").and_then(|v| v.as_str()),
///     Some("FEDEX_GROUND")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyTree(JsonValue);

impl ReplyTree {
    /// Wraps a decoded reply.
    #[must_use]
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON value.
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }

    /// Consumes the tree, returning the JSON value.
    #[must_use]
    pub fn into_inner(self) -> JsonValue {
        self.0
    }

    /// Returns true if the root is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// Reads a value through a dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        path.split('.')
            .try_fold(&self.0, |current, segment| current.get(segment))
    }

    /// Returns the elements at `path`.
    ///
    /// Services collapse one-element sequences to a bare object, so a single
    /// object is returned as a one-element list. Missing paths yield nothing.
    #[must_use]
    pub fn items(&self, path: &str) -> Vec<&JsonValue> {
        match self.get(path) {
            Some(JsonValue::Array(items)) => items.iter().collect(),
            Some(JsonValue::Null) | None => Vec::new(),
            Some(single) => vec![single],
        }
    }

    /// Deserializes the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if the value does not have the shape of `T`.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> serde_json::Result<Option<T>> {
        self.get(path)
            .map(|value| T::deserialize(value))
            .transpose()
    }
}

impl From<JsonValue> for ReplyTree {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

/// Classified reply of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// Operation name.
    pub operation: String,
    /// Highest severity of the reply.
    pub severity: Severity,
    /// Notifications in reply order.
    pub notifications: Vec<Notification>,
    /// Reply tree.
    pub result: ReplyTree,
}

impl ResponseEnvelope {
    /// Returns true if the service reported plain success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }

    /// Returns notifications at or above `severity`.
    pub fn notifications_at_least(
        &self,
        severity: Severity,
    ) -> impl Iterator<Item = &Notification> {
        self.notifications
            .iter()
            .filter(move |n| n.severity().meets(severity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("key", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("key"));
        assert!(!debug.contains("hunter2"));
    }

    mod reply_tree {
        use super::*;

        #[test]
        fn dotted_get() {
            let tree = ReplyTree::new(json!({ "A": { "B": { "C": 1 } } }));
            assert_eq!(tree.get("A.B.C"), Some(&json!(1)));
            assert_eq!(tree.get("A.X.C"), None);
        }

        #[test]
        fn items_normalizes_single_object() {
            let tree = ReplyTree::new(json!({
                "Many": [ { "N": 1 }, { "N": 2 } ],
                "One": { "N": 3 },
                "None": null
            }));
            assert_eq!(tree.items("Many").len(), 2);
            assert_eq!(tree.items("One"), vec![&json!({ "N": 3 })]);
            assert!(tree.items("None").is_empty());
            assert!(tree.items("Missing").is_empty());
        }

        #[test]
        fn extract() {
            let tree = ReplyTree::new(json!({ "Count": 2 }));
            assert_eq!(tree.extract::<u32>("Count").unwrap(), Some(2));
            assert_eq!(tree.extract::<u32>("Missing").unwrap(), None);
            assert!(tree.extract::<u32>("Count.Deeper").unwrap().is_none());
        }
    }

    #[test]
    fn notifications_at_least() {
        let envelope = ResponseEnvelope {
            operation: "getRates".into(),
            severity: Severity::Warning,
            notifications: vec![
                Notification::new(Severity::Note, "1", "note"),
                Notification::new(Severity::Warning, "2", "warning"),
            ],
            result: ReplyTree::default(),
        };
        assert!(!envelope.is_success());
        let codes: Vec<&str> = envelope
            .notifications_at_least(Severity::Warning)
            .map(Notification::code)
            .collect();
        assert_eq!(codes, vec!["2"]);
    }
}
