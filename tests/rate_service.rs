//! End-to-end rate scenarios over the bundled contract and a scripted transport.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use carrier_rate::application::{ClientError, ClientSettings, RateRequestBuilder};
use carrier_rate::domain::contract::ContractCatalog;
use carrier_rate::domain::envelope::{AuthenticationBlock, ClientDetail, Credentials};
use carrier_rate::domain::errors::ContractError;
use carrier_rate::domain::typed_object::TypedObject;
use carrier_rate::domain::value_objects::{Severity, Timestamp};
use carrier_rate::infrastructure::contract::RATE_SERVICE_CONTRACT;
use carrier_rate::infrastructure::transport::{ScriptedTransport, TransportInvoker};
use chrono::Weekday;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn settings() -> ClientSettings {
    ClientSettings::new(AuthenticationBlock {
        credentials: Credentials::new("test-key", "test-password"),
        client: ClientDetail {
            account_number: "510087020".into(),
            meter_number: "118500000".into(),
            ..ClientDetail::default()
        },
    })
}

fn rate_builder(invoker: TransportInvoker) -> RateRequestBuilder {
    let catalog = Arc::new(ContractCatalog::from_json(RATE_SERVICE_CONTRACT).unwrap());
    RateRequestBuilder::new(catalog, settings(), invoker).unwrap()
}

fn one_pound(rate: &RateRequestBuilder) -> TypedObject {
    let mut weight = rate.create_object_of_type("Weight").unwrap();
    weight.set("Units", "LB").unwrap();
    weight.set("Value", Decimal::new(10, 1)).unwrap();
    let mut package = rate.create_object_of_type("RequestedPackageLineItem").unwrap();
    package.set("Weight", weight).unwrap();
    package
}

fn ground_shipment(rate: &mut RateRequestBuilder, service: Option<&str>) {
    let shipment = rate.shipment_mut().unwrap();
    shipment.set("DropoffType", "REGULAR_PICKUP").unwrap();
    shipment.set("ServiceType", service).unwrap();
    shipment.set("PackagingType", "YOUR_PACKAGING").unwrap();
    shipment
        .set_path("ShippingChargesPayment.PaymentType", "SENDER")
        .unwrap();

    let shipper = rate.shipper_address_mut().unwrap();
    shipper.set("StateOrProvinceCode", "SC").unwrap();
    shipper.set("PostalCode", "29631").unwrap();
    shipper.set("CountryCode", "US").unwrap();

    let recipient = rate.recipient_address_mut().unwrap();
    recipient.set("StateOrProvinceCode", "NC").unwrap();
    recipient.set("PostalCode", "27577").unwrap();
    recipient.set("CountryCode", "US").unwrap();

    let package = one_pound(rate);
    rate.add_package(package).unwrap();
}

#[tokio::test]
async fn ground_quote_succeeds() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(json!({
        "RateReply": {
            "HighestSeverity": "SUCCESS",
            "Notifications": [
                {
                    "Severity": "SUCCESS",
                    "Source": "crs",
                    "Code": "0",
                    "Message": "Request was successfully processed."
                }
            ],
            "RateReplyDetails": [
                {
                    "ServiceType": "FEDEX_GROUND",
                    "PackagingType": "YOUR_PACKAGING",
                    "TotalNetCharge": { "Currency": "USD", "Amount": "9.84" }
                }
            ]
        }
    })));
    let mut rate = rate_builder(TransportInvoker::new(transport.clone()));
    ground_shipment(&mut rate, Some("FEDEX_GROUND"));

    let response = rate.send().await.unwrap();
    assert_eq!(response.severity, Severity::Success);
    assert!(response.is_success());

    let details = rate.rate_reply_details().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].service_type.as_deref(), Some("FEDEX_GROUND"));
    assert_eq!(
        details[0].total_net_charge.as_ref().unwrap().amount,
        Decimal::new(984, 2)
    );

    let payload = transport.last_request().unwrap().payload;
    let request = &payload["RateRequest"];
    assert_eq!(request["WebAuthenticationDetail"]["UserCredential"]["Key"], json!("test-key"));
    assert_eq!(request["ClientDetail"]["AccountNumber"], json!("510087020"));
    assert_eq!(request["Version"]["ServiceId"], json!("crs"));
    let shipment = &request["RequestedShipment"];
    assert_eq!(shipment["ServiceType"], json!("FEDEX_GROUND"));
    assert_eq!(shipment["Shipper"]["Address"]["PostalCode"], json!("29631"));
    assert_eq!(shipment["Recipient"]["Address"]["PostalCode"], json!("27577"));
    assert_eq!(shipment["PackageCount"], json!(1));
    assert_eq!(
        shipment["RequestedPackageLineItems"][0]["Weight"]["Units"],
        json!("LB")
    );
}

#[tokio::test]
async fn notes_and_warnings_are_returned_not_raised() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(json!({
        "HighestSeverity": "WARNING",
        "Notifications": [
            { "Severity": "NOTE", "Code": "819", "Message": "Rates are estimates." },
            { "Severity": "WARNING", "Code": "556", "Message": "Residential surcharge may apply." }
        ]
    })));
    let mut rate = rate_builder(TransportInvoker::new(transport));
    ground_shipment(&mut rate, Some("FEDEX_GROUND"));

    let response = rate.send().await.unwrap();

    assert_eq!(response.severity, Severity::Warning);
    let codes: Vec<&str> = response.notifications.iter().map(|n| n.code()).collect();
    assert_eq!(codes, vec!["819", "556"]);
    assert_eq!(response.notifications_at_least(Severity::Warning).count(), 1);
}

#[tokio::test]
async fn failure_reply_is_rejected() {
    let transport = Arc::new(ScriptedTransport::new().with_reply(json!({
        "HighestSeverity": "FAILURE",
        "Notifications": {
            "Severity": "FAILURE",
            "Source": "prof",
            "Code": "1000",
            "Message": "Authentication Failed"
        }
    })));
    let mut rate = rate_builder(TransportInvoker::new(transport));
    ground_shipment(&mut rate, Some("FEDEX_GROUND"));

    let err = rate.send().await.unwrap_err();

    assert!(err.is_service_rejected());
    assert_eq!(err.primary_message(), Some("Authentication Failed"));
    assert!(rate.response().is_none());
    assert!(rate.rate_reply_details().unwrap().is_empty());
}

#[tokio::test]
async fn nested_required_fields_are_left_to_the_service() {
    let transport =
        Arc::new(ScriptedTransport::new().with_reply(json!({ "HighestSeverity": "SUCCESS" })));
    let mut rate = rate_builder(TransportInvoker::new(transport.clone()));
    ground_shipment(&mut rate, None);
    rate.recipient_address_mut().unwrap().clear("CountryCode").unwrap();

    rate.send().await.unwrap();
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn incomplete_request_never_reaches_transport() {
    let transport =
        Arc::new(ScriptedTransport::new().with_reply(json!({ "HighestSeverity": "SUCCESS" })));
    let mut rate = rate_builder(TransportInvoker::new(transport.clone()));
    rate.request_mut().clear("RequestedShipment").unwrap();

    let err = rate.send().await.unwrap_err();

    assert_eq!(err, ClientError::incomplete_request("RequestedShipment"));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn wrong_line_item_type_is_rejected() {
    let mut rate = rate_builder(TransportInvoker::new(Arc::new(ScriptedTransport::new())));
    let address = rate.create_object_of_type("Address").unwrap();

    let err = rate.add_package(address).unwrap_err();

    assert!(matches!(err, ClientError::Contract(ContractError::ShapeMismatch { .. })));
    assert!(rate.packages().unwrap().is_empty());
}

#[tokio::test]
async fn saturday_delivery_rates_every_service() {
    let delivery = "2026-10-24T10:30:00Z";
    let transport = Arc::new(ScriptedTransport::new().with_reply(json!({
        "HighestSeverity": "SUCCESS",
        "RateReplyDetails": [
            {
                "ServiceType": "PRIORITY_OVERNIGHT",
                "AppliedOptions": ["SATURDAY_DELIVERY"],
                "DeliveryTimestamp": delivery,
                "TotalNetCharge": { "Currency": "USD", "Amount": "61.20" }
            },
            {
                "ServiceType": "FEDEX_2_DAY",
                "AppliedOptions": "SATURDAY_DELIVERY",
                "TotalNetCharge": { "Currency": "USD", "Amount": 30 }
            }
        ]
    })));
    let mut rate = rate_builder(TransportInvoker::new(transport.clone()));
    ground_shipment(&mut rate, None);

    let friday = Timestamp::now().next_weekday(Weekday::Fri);
    rate.shipment_mut().unwrap().set("ShipTimestamp", friday).unwrap();
    rate.request_mut()
        .push("VariableOptions", "SATURDAY_DELIVERY")
        .unwrap();

    rate.send().await.unwrap();

    let payload = transport.last_request().unwrap().payload;
    let request = &payload["RateRequest"];
    assert_eq!(request["VariableOptions"], json!(["SATURDAY_DELIVERY"]));
    assert!(request["RequestedShipment"].get("ServiceType").is_none());
    assert_eq!(friday.weekday(), Weekday::Fri);

    let details = rate.rate_reply_details().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details.iter().all(|d| d.has_applied_option("SATURDAY_DELIVERY")));
    assert_eq!(details[0].delivery_timestamp, Timestamp::parse_rfc3339(delivery));
    assert_eq!(
        details[1].total_net_charge.as_ref().unwrap().amount,
        Decimal::from(30)
    );
}

#[tokio::test]
async fn slow_service_times_out() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_reply(json!({ "HighestSeverity": "SUCCESS" }))
            .with_delay(Duration::from_millis(200)),
    );
    let invoker = TransportInvoker::new(transport).with_timeout(Duration::from_millis(20));
    let mut rate = rate_builder(invoker);
    ground_shipment(&mut rate, Some("FEDEX_GROUND"));

    let err = rate.send().await.unwrap_err();

    assert!(err.is_timeout());
    assert!(err.is_retryable());
    assert!(rate.response().is_none());
}
