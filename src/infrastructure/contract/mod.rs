//! # Contract Sources
//!
//! Loading contract descriptions and caching the resulting catalogs.

pub mod loader;
pub mod registry;

pub use loader::{ContractLoader, ContractLocation, DefaultContractLoader};
pub use registry::CatalogRegistry;

/// The rate service contract shipped with the crate.
pub const RATE_SERVICE_CONTRACT: &str = include_str!("../../../contracts/rate_service.json");
