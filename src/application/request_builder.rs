//! # Request Builder
//!
//! Per-operation façade over a contract catalog.
//!
//! A [`RequestBuilder`] owns the [`RequestEnvelope`] of one operation. Callers
//! populate the root object in place, create nested objects through the
//! builder and call [`RequestBuilder::send`], which validates, invokes the
//! transport and classifies the reply. The builder can be re-sent; each send
//! is an independent attempt with its own attempt id.

use super::classifier::ResponseClassifier;
use super::error::{ClientError, ClientResult};
use crate::domain::contract::{ContractCatalog, FieldKind, OperationDef};
use crate::domain::envelope::{
    AuthenticationBlock, EnvelopeMetadata, RequestEnvelope, ResponseEnvelope,
};
use crate::domain::errors::{ContractError, ContractResult};
use crate::domain::typed_object::{ObjectFactory, TypedObject, Value};
use crate::domain::value_objects::Severity;
use crate::infrastructure::config::ServiceConfig;
use crate::infrastructure::transport::TransportInvoker;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

/// Caller-level settings passed into every builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Authentication block sent with every request.
    pub authentication: AuthenticationBlock,
    /// Lowest severity treated as a rejection.
    pub failure_threshold: Severity,
}

impl ClientSettings {
    /// Creates settings with the default `ERROR` threshold.
    #[must_use]
    pub fn new(authentication: AuthenticationBlock) -> Self {
        Self {
            authentication,
            failure_threshold: Severity::Error,
        }
    }

    /// Sets the failure threshold.
    #[must_use]
    pub fn with_failure_threshold(mut self, failure_threshold: Severity) -> Self {
        self.failure_threshold = failure_threshold;
        self
    }

    /// Derives settings from service configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if credentials are missing or the
    /// failure threshold is not a severity.
    pub fn from_config(config: &ServiceConfig) -> ClientResult<Self> {
        if !config.has_credentials() {
            return Err(ClientError::configuration(
                "key, password, account_number and meter_number must all be set",
            ));
        }
        Ok(Self::new(config.authentication()).with_failure_threshold(config.failure_threshold()?))
    }
}

/// Builder and sender for one operation.
#[derive(Debug)]
pub struct RequestBuilder {
    factory: ObjectFactory,
    operation: OperationDef,
    envelope: RequestEnvelope,
    invoker: TransportInvoker,
    classifier: ResponseClassifier,
    line_items: Option<LineItemField>,
    response: Option<ResponseEnvelope>,
}

#[derive(Debug, Clone)]
struct LineItemField {
    parent: Option<String>,
    field: String,
    element_type: String,
}

impl RequestBuilder {
    /// Creates a builder for `operation` with an empty root request.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownOperation` if the catalog does not
    /// declare the operation.
    pub fn new(
        catalog: Arc<ContractCatalog>,
        operation: &str,
        settings: ClientSettings,
        invoker: TransportInvoker,
    ) -> ClientResult<Self> {
        let operation = catalog.operation(operation)?.clone();
        let factory = ObjectFactory::new(Arc::clone(&catalog));
        let body = factory.create(&operation.input)?;
        let metadata = EnvelopeMetadata::new(
            operation.name.clone(),
            settings.authentication,
            catalog.version().cloned(),
        );

        Ok(Self {
            factory,
            operation,
            envelope: RequestEnvelope::new(metadata, body),
            invoker,
            classifier: ResponseClassifier::new(settings.failure_threshold),
            line_items: None,
            response: None,
        })
    }

    /// Designates the repeated field `add_line_item` appends to, as a dotted
    /// path from the root request.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` if a segment is not declared and
    /// `ContractError::ShapeMismatch` if the path does not end in a sequence
    /// of objects.
    pub fn with_line_item_path(mut self, path: &str) -> ClientResult<Self> {
        let catalog = self.factory.catalog();
        let (parent, field) = match path.rsplit_once('.') {
            Some((parent, field)) => (Some(parent), field),
            None => (None, path),
        };

        let mut owner = catalog.resolve(&self.operation.input)?;
        for segment in parent.into_iter().flat_map(|p| p.split('.')) {
            let def = owner.field(segment)?;
            match def.kind() {
                FieldKind::Nested(type_name) => owner = catalog.resolve(type_name)?,
                other => {
                    return Err(ContractError::shape_mismatch(
                        owner.name(),
                        segment,
                        "object field",
                        other.to_string(),
                    )
                    .into());
                }
            }
        }

        let def = owner.field(field)?;
        let element_type = match def.kind() {
            FieldKind::Repeated(element) if !catalog.resolve(element)?.is_enumeration() => {
                element.clone()
            }
            other => {
                return Err(ContractError::shape_mismatch(
                    owner.name(),
                    field,
                    "sequence of objects",
                    other.to_string(),
                )
                .into());
            }
        };

        self.line_items = Some(LineItemField {
            parent: parent.map(str::to_string),
            field: field.to_string(),
            element_type,
        });
        Ok(self)
    }

    /// Returns the operation name.
    #[inline]
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation.name
    }

    /// Returns the factory over this builder's catalog.
    #[must_use]
    pub fn factory(&self) -> &ObjectFactory {
        &self.factory
    }

    /// Returns the root request object.
    #[must_use]
    pub fn request(&self) -> &TypedObject {
        &self.envelope.body
    }

    /// Returns the root request object for in-place population.
    pub fn request_mut(&mut self) -> &mut TypedObject {
        &mut self.envelope.body
    }

    /// Returns the envelope metadata.
    #[must_use]
    pub fn metadata(&self) -> &EnvelopeMetadata {
        &self.envelope.metadata
    }

    /// Returns the envelope metadata for modification.
    pub fn metadata_mut(&mut self) -> &mut EnvelopeMetadata {
        &mut self.envelope.metadata
    }

    /// Sets the customer transaction id echoed back by the service.
    pub fn set_customer_transaction_id(&mut self, id: impl Into<String>) {
        self.envelope.metadata.customer_transaction_id = Some(id.into());
    }

    /// Creates an empty object of a contract type.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownType` if the contract declares no such type.
    pub fn create_object_of_type(&self, type_name: &str) -> ClientResult<TypedObject> {
        Ok(self.factory.create(type_name)?)
    }

    /// Appends an item to the line-item sequence.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ShapeMismatch` if no line-item path is set or
    /// the item's type differs from the sequence's element type. Nothing is
    /// modified on error.
    pub fn add_line_item(&mut self, item: TypedObject) -> ClientResult<()> {
        let target = self.line_item_field()?.clone();
        if !item.conforms_to(self.factory.catalog(), &target.element_type) {
            return Err(ContractError::shape_mismatch(
                self.operation.input.as_str(),
                target.field.as_str(),
                format!("sequence of {}", target.element_type),
                format!("object {}", item.type_name()),
            )
            .into());
        }

        let owner = match &target.parent {
            Some(parent) => self.envelope.body.object_at_mut(parent)?,
            None => &mut self.envelope.body,
        };
        owner.push(&target.field, item)?;
        Ok(())
    }

    /// Returns the current line items.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ShapeMismatch` if no line-item path is set.
    pub fn line_items(&self) -> ClientResult<&[Value]> {
        let target = self.line_item_field()?;
        let owner = match &target.parent {
            Some(parent) => match self.envelope.body.get_path(parent)? {
                Some(Value::Object(owner)) => owner,
                _ => return Ok(&[]),
            },
            None => &self.envelope.body,
        };
        Ok(owner.items(&target.field)?)
    }

    /// Validates, sends and classifies the request.
    ///
    /// The previous response is discarded first; on success the new one is
    /// stored and returned.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::IncompleteRequest` before any transport call if
    /// a required root field is unset, `ClientError::Transport` for delivery
    /// failures and `ClientError::ServiceRejected` for replies at or above
    /// the failure threshold.
    pub async fn send(&mut self) -> ClientResult<&ResponseEnvelope> {
        self.response = None;

        if let Some(field) = self.envelope.body.missing_required_fields().first() {
            return Err(ClientError::incomplete_request(*field));
        }

        let attempt_id = Uuid::new_v4();
        let span = info_span!("send", operation = %self.operation.name, attempt_id = %attempt_id);
        let response = self.attempt(attempt_id).instrument(span).await?;

        Ok(self.response.insert(response))
    }

    async fn attempt(&self, attempt_id: Uuid) -> ClientResult<ResponseEnvelope> {
        debug!("sending request");
        let reply = self
            .invoker
            .invoke(&self.envelope, &self.operation.output, attempt_id)
            .await?;
        self.classifier.classify(&self.operation.name, reply)
    }

    /// Returns the response of the last successful send.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        self.response.as_ref()
    }

    fn line_item_field(&self) -> ContractResult<&LineItemField> {
        self.line_items.as_ref().ok_or_else(|| {
            ContractError::shape_mismatch(
                self.operation.input.as_str(),
                "line items",
                "a configured line-item sequence",
                "none",
            )
        })
    }
}
