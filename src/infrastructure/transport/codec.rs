//! # Payload Codec
//!
//! Converts request envelopes to JSON payloads and unwraps replies.
//!
//! A request payload is a single-key object named after the input type. The
//! authentication, transaction and version blocks come first, followed by
//! the body's populated fields in contract order:
//!
//! ```text
//! { "RateRequest": {
//!     "WebAuthenticationDetail": { "UserCredential": { "Key": ..., "Password": ... } },
//!     "ClientDetail": { "AccountNumber": ..., "MeterNumber": ... },
//!     "Version": { "ServiceId": "crs", "Major": 18, ... },
//!     "RequestedShipment": { ... } } }
//! ```

use super::error::{TransportError, TransportResult};
use crate::domain::contract::ServiceVersion;
use crate::domain::envelope::{EnvelopeMetadata, ReplyTree, RequestEnvelope};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WebAuthenticationDetail<'a> {
    user_credential: UserCredential<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct UserCredential<'a> {
    key: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireClientDetail<'a> {
    account_number: &'a str,
    meter_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    integrator_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TransactionDetail<'a> {
    customer_transaction_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireVersion<'a> {
    service_id: &'a str,
    major: u32,
    intermediate: u32,
    minor: u32,
}

impl<'a> From<&'a ServiceVersion> for WireVersion<'a> {
    fn from(version: &'a ServiceVersion) -> Self {
        Self {
            service_id: &version.service_id,
            major: version.major,
            intermediate: version.intermediate,
            minor: version.minor,
        }
    }
}

/// Encodes an envelope as a request payload.
///
/// # Errors
///
/// Returns `TransportError::Internal` if the body does not serialize to a
/// JSON object or populates a field named like an injected metadata block.
pub fn encode_request(envelope: &RequestEnvelope) -> TransportResult<JsonValue> {
    let mut payload = metadata_blocks(&envelope.metadata)?;

    let body = serde_json::to_value(&envelope.body)
        .map_err(|e| TransportError::internal(format!("Failed to encode request body: {}", e)))?;
    let JsonValue::Object(fields) = body else {
        return Err(TransportError::internal(format!(
            "request body {} did not encode to an object",
            envelope.body.type_name()
        )));
    };
    for (name, value) in fields {
        if payload.contains_key(&name) {
            return Err(TransportError::internal(format!(
                "request body {} sets {}, which is injected from configuration",
                envelope.body.type_name(),
                name
            )));
        }
        payload.insert(name, value);
    }

    let mut root = Map::with_capacity(1);
    root.insert(
        envelope.body.type_name().to_string(),
        JsonValue::Object(payload),
    );
    Ok(JsonValue::Object(root))
}

fn metadata_blocks(metadata: &EnvelopeMetadata) -> TransportResult<Map<String, JsonValue>> {
    let auth = &metadata.authentication;
    let mut blocks = Map::new();

    blocks.insert(
        "WebAuthenticationDetail".to_string(),
        to_json(&WebAuthenticationDetail {
            user_credential: UserCredential {
                key: &auth.credentials.key,
                password: &auth.credentials.password,
            },
        })?,
    );
    blocks.insert(
        "ClientDetail".to_string(),
        to_json(&WireClientDetail {
            account_number: &auth.client.account_number,
            meter_number: &auth.client.meter_number,
            integrator_id: auth.client.integrator_id.as_deref(),
            region: auth.client.region.as_deref(),
        })?,
    );
    if let Some(id) = metadata.customer_transaction_id.as_deref() {
        blocks.insert(
            "TransactionDetail".to_string(),
            to_json(&TransactionDetail {
                customer_transaction_id: id,
            })?,
        );
    }
    if let Some(version) = &metadata.version {
        blocks.insert("Version".to_string(), to_json(&WireVersion::from(version))?);
    }
    Ok(blocks)
}

fn to_json<T: Serialize>(value: &T) -> TransportResult<JsonValue> {
    serde_json::to_value(value)
        .map_err(|e| TransportError::internal(format!("Failed to encode envelope: {}", e)))
}

/// Unwraps a reply, removing the optional `{ "<OutputType>": ... }` wrapper.
#[must_use]
pub fn decode_reply(output_type: &str, reply: JsonValue) -> ReplyTree {
    match reply {
        JsonValue::Object(mut map) if map.len() == 1 && map.contains_key(output_type) => {
            ReplyTree::new(map.remove(output_type).unwrap_or_default())
        }
        other => ReplyTree::new(other),
    }
}
