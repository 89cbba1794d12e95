//! # Rate Requests
//!
//! Builder for the `getRates` operation of the rate service.
//!
//! [`RateRequestBuilder`] prepares the shipment skeleton (shipper and
//! recipient addresses, charges payment), manages the package line items and
//! keeps `PackageCount` in step with them. After a successful send,
//! [`RateRequestBuilder::rate_reply_details`] reads the quoted options.
//!
//! Leaving `RequestedShipment.ServiceType` unset asks the service to rate
//! every applicable service.

use super::error::{ClientError, ClientResult};
use super::request_builder::{ClientSettings, RequestBuilder};
use crate::domain::contract::ContractCatalog;
use crate::domain::envelope::ResponseEnvelope;
use crate::domain::typed_object::{ObjectFactory, TypedObject, Value};
use crate::domain::value_objects::Timestamp;
use crate::infrastructure::config::ServiceConfig;
use crate::infrastructure::transport::{HttpTransport, TransportError, TransportInvoker};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Operation name of the rate call.
pub const RATE_OPERATION: &str = "getRates";

/// Path of the package line items within the root request.
pub const PACKAGE_LINE_ITEMS_PATH: &str = "RequestedShipment.RequestedPackageLineItems";

/// Path of the package count within the root request.
pub const PACKAGE_COUNT_PATH: &str = "RequestedShipment.PackageCount";

/// Reply field holding the quoted options.
pub const RATE_REPLY_DETAILS_FIELD: &str = "RateReplyDetails";

const SKELETON_PATHS: [&str; 3] = [
    "RequestedShipment.Shipper.Address",
    "RequestedShipment.Recipient.Address",
    "RequestedShipment.ShippingChargesPayment",
];

/// Builder for rate requests.
#[derive(Debug)]
pub struct RateRequestBuilder {
    inner: RequestBuilder,
}

impl RateRequestBuilder {
    /// Creates a rate builder over `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Contract` if the catalog does not declare the
    /// rate operation or the shipment skeleton.
    pub fn new(
        catalog: Arc<ContractCatalog>,
        settings: ClientSettings,
        invoker: TransportInvoker,
    ) -> ClientResult<Self> {
        let mut inner = RequestBuilder::new(catalog, RATE_OPERATION, settings, invoker)?
            .with_line_item_path(PACKAGE_LINE_ITEMS_PATH)?;

        let request = inner.request_mut();
        for path in SKELETON_PATHS {
            request.object_at_mut(path)?;
        }

        Ok(Self { inner })
    }

    /// Creates a rate builder sending over HTTP to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` for unusable configuration and
    /// `ClientError::Transport` if the HTTP client cannot be built.
    pub fn from_config(
        config: &ServiceConfig,
        catalog: Arc<ContractCatalog>,
    ) -> ClientResult<Self> {
        let settings = ClientSettings::from_config(config)?;
        let transport = HttpTransport::new(config.endpoint(), config.timeout_ms)?;
        let invoker = TransportInvoker::new(Arc::new(transport)).with_timeout(config.timeout());
        Self::new(catalog, settings, invoker)
    }

    /// Returns the generic builder.
    #[must_use]
    pub fn builder(&self) -> &RequestBuilder {
        &self.inner
    }

    /// Returns the generic builder for modification.
    pub fn builder_mut(&mut self) -> &mut RequestBuilder {
        &mut self.inner
    }

    /// Returns the factory over the rate contract.
    #[must_use]
    pub fn factory(&self) -> &ObjectFactory {
        self.inner.factory()
    }

    /// Returns the root `RateRequest`.
    #[must_use]
    pub fn request(&self) -> &TypedObject {
        self.inner.request()
    }

    /// Returns the root `RateRequest` for in-place population.
    pub fn request_mut(&mut self) -> &mut TypedObject {
        self.inner.request_mut()
    }

    /// Returns `RequestedShipment`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Contract` if the contract has no such field.
    pub fn shipment_mut(&mut self) -> ClientResult<&mut TypedObject> {
        Ok(self.inner.request_mut().object_mut("RequestedShipment")?)
    }

    /// Returns the shipper's address.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Contract` if the contract has no such path.
    pub fn shipper_address_mut(&mut self) -> ClientResult<&mut TypedObject> {
        Ok(self
            .inner
            .request_mut()
            .object_at_mut("RequestedShipment.Shipper.Address")?)
    }

    /// Returns the recipient's address.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Contract` if the contract has no such path.
    pub fn recipient_address_mut(&mut self) -> ClientResult<&mut TypedObject> {
        Ok(self
            .inner
            .request_mut()
            .object_at_mut("RequestedShipment.Recipient.Address")?)
    }

    /// Creates an empty object of a contract type.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownType` for undeclared types.
    pub fn create_object_of_type(&self, type_name: &str) -> ClientResult<TypedObject> {
        self.inner.create_object_of_type(type_name)
    }

    /// Appends a package line item and updates `PackageCount`.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ShapeMismatch` if `package` is not a
    /// `RequestedPackageLineItem`.
    pub fn add_package(&mut self, package: TypedObject) -> ClientResult<()> {
        self.inner.add_line_item(package)?;
        let count = i64::try_from(self.inner.line_items()?.len()).unwrap_or(i64::MAX);
        self.inner.request_mut().set_path(PACKAGE_COUNT_PATH, count)?;
        Ok(())
    }

    /// Returns the package line items.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Contract` if the contract has no line-item field.
    pub fn packages(&self) -> ClientResult<&[Value]> {
        self.inner.line_items()
    }

    /// Sends the rate request.
    ///
    /// # Errors
    ///
    /// See [`RequestBuilder::send`].
    pub async fn send(&mut self) -> ClientResult<&ResponseEnvelope> {
        self.inner.send().await
    }

    /// Returns the response of the last successful send.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        self.inner.response()
    }

    /// Returns the quoted options of the last successful send.
    ///
    /// Empty when nothing has been sent or the reply lists no options.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if a detail does not have the expected shape.
    pub fn rate_reply_details(&self) -> ClientResult<Vec<RateReplyDetail>> {
        let Some(response) = self.inner.response() else {
            return Ok(Vec::new());
        };
        response
            .result
            .items(RATE_REPLY_DETAILS_FIELD)
            .into_iter()
            .map(|value| {
                RateReplyDetail::deserialize(value).map_err(|e| {
                    ClientError::from(TransportError::protocol(format!(
                        "malformed rate reply detail: {}",
                        e
                    )))
                })
            })
            .collect()
    }
}

/// Monetary amount with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Money {
    /// ISO currency code.
    pub currency: String,
    /// Amount.
    pub amount: Decimal,
}

/// One quoted rating option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RateReplyDetail {
    /// Service the option applies to.
    #[serde(default)]
    pub service_type: Option<String>,
    /// Packaging the option applies to.
    #[serde(default)]
    pub packaging_type: Option<String>,
    /// Special services applied to this option.
    #[serde(default, deserialize_with = "one_or_many")]
    pub applied_options: Vec<String>,
    /// Committed delivery time.
    #[serde(default)]
    pub delivery_timestamp: Option<Timestamp>,
    /// Net charge for the shipment.
    #[serde(default)]
    pub total_net_charge: Option<Money>,
}

impl RateReplyDetail {
    /// Returns true if `option` was applied to this quote.
    #[must_use]
    pub fn has_applied_option(&self, option: &str) -> bool {
        self.applied_options.iter().any(|o| o == option)
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}
