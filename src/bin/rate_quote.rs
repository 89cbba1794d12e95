//! `rate-quote`: quotes a single-package shipment against the rate service.

use anyhow::{Context, Result};
use carrier_rate::application::RateRequestBuilder;
use carrier_rate::domain::value_objects::Timestamp;
use carrier_rate::infrastructure::config::ServiceConfig;
use carrier_rate::infrastructure::contract::{CatalogRegistry, DefaultContractLoader};
use carrier_rate::infrastructure::telemetry::init_tracing;
use chrono::Weekday;
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

/// Quote a single-package shipment.
#[derive(Debug, Parser)]
#[command(name = "rate-quote", version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, env = "CARRIER_RATE_CONFIG", default_value = "carrier-rate.toml")]
    config: PathBuf,

    /// Shipper state or province code.
    #[arg(long)]
    from_state: Option<String>,

    /// Shipper postal code.
    #[arg(long)]
    from_postal: String,

    /// Shipper country code.
    #[arg(long, default_value = "US")]
    from_country: String,

    /// Recipient state or province code.
    #[arg(long)]
    to_state: Option<String>,

    /// Recipient postal code.
    #[arg(long)]
    to_postal: String,

    /// Recipient country code.
    #[arg(long, default_value = "US")]
    to_country: String,

    /// Package weight.
    #[arg(long)]
    weight: Decimal,

    /// Weight units.
    #[arg(long, default_value = "LB")]
    units: String,

    /// Service to rate; every service when omitted.
    #[arg(long)]
    service: Option<String>,

    /// Ship next Friday with Saturday delivery.
    #[arg(long)]
    saturday: bool,

    /// Log as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs).map_err(|e| anyhow::anyhow!(e))?;

    let config = ServiceConfig::load_from(&cli.config).context("loading configuration")?;
    let registry = CatalogRegistry::new(Arc::new(DefaultContractLoader::new(config.timeout_ms)?));
    let catalog = registry
        .get_or_load(&config.contract_location()?)
        .await
        .context("loading contract")?;

    let mut rate = RateRequestBuilder::from_config(&config, catalog)?;
    populate(&mut rate, &cli)?;

    rate.send().await.context("rate request failed")?;
    for detail in rate.rate_reply_details()? {
        println!("{}", serde_json::to_string(&detail)?);
    }
    Ok(())
}

fn populate(rate: &mut RateRequestBuilder, cli: &Cli) -> Result<()> {
    let ship_at = if cli.saturday {
        Timestamp::now().next_weekday(Weekday::Fri)
    } else {
        Timestamp::now()
    };

    let shipment = rate.shipment_mut()?;
    shipment.set("ShipTimestamp", ship_at)?;
    shipment.set("DropoffType", "REGULAR_PICKUP")?;
    shipment.set("PackagingType", "YOUR_PACKAGING")?;
    shipment.set_path("ShippingChargesPayment.PaymentType", "SENDER")?;
    if let Some(service) = &cli.service {
        shipment.set("ServiceType", service.as_str())?;
    }

    let shipper = rate.shipper_address_mut()?;
    shipper.set("StateOrProvinceCode", cli.from_state.clone())?;
    shipper.set("PostalCode", cli.from_postal.as_str())?;
    shipper.set("CountryCode", cli.from_country.as_str())?;

    let recipient = rate.recipient_address_mut()?;
    recipient.set("StateOrProvinceCode", cli.to_state.clone())?;
    recipient.set("PostalCode", cli.to_postal.as_str())?;
    recipient.set("CountryCode", cli.to_country.as_str())?;

    if cli.saturday {
        rate.request_mut().push("VariableOptions", "SATURDAY_DELIVERY")?;
    }

    let mut weight = rate.create_object_of_type("Weight")?;
    weight.set("Units", cli.units.as_str())?;
    weight.set("Value", cli.weight)?;
    let mut package = rate.create_object_of_type("RequestedPackageLineItem")?;
    package.set("Weight", weight)?;
    rate.add_package(package)?;
    Ok(())
}
