//! # carrier-rate
//!
//! Contract-typed client for carrier freight-rate web services.
//!
//! The crate loads a service contract, builds request objects shaped by the
//! contract's type graph, sends them through a pluggable transport and
//! classifies the reply by severity.
//!
//! ## Layers
//!
//! - [`domain`]: contract catalog, typed objects, severities and notifications
//! - [`application`]: request builders, response classification, errors
//! - [`infrastructure`]: transport, contract loading, configuration, telemetry
//!
//! # Examples
//!
//! ```
//! use carrier_rate::domain::contract::ContractCatalog;
//! use carrier_rate::domain::typed_object::ObjectFactory;
//! use carrier_rate::infrastructure::contract::RATE_SERVICE_CONTRACT;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ContractCatalog::from_json(RATE_SERVICE_CONTRACT).unwrap());
//! let factory = ObjectFactory::new(catalog);
//!
//! let mut weight = factory.create("Weight").unwrap();
//! weight.set("Units", "LB").unwrap();
//! assert!(weight.is_set("Units").unwrap());
//! assert!(weight.set("Colour", "red").is_err());
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
