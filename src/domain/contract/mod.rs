//! # Service Contract
//!
//! Schema model of a service contract.
//!
//! - [`ContractDocument`]: serialized contract description
//! - [`ContractCatalog`]: validated per-contract type and operation lookup
//! - [`ContractType`]: one named schema entry with its field table or constants

pub mod catalog;
pub mod contract_type;
pub mod document;

pub use catalog::ContractCatalog;
pub use contract_type::{ContractType, FieldDef, FieldKind, PrimitiveKind, TypeShape};
pub use document::{ContractDocument, FieldDocument, OperationDef, ServiceVersion, TypeDocument};
