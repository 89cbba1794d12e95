//! # Contract Document
//!
//! Serialized description of a service contract.
//!
//! The document is a JSON rendering of the service's WSDL type graph: the
//! operations it exposes, the version block requests must carry, and every
//! named type with its fields or constants. [`ContractCatalog`] validates and
//! indexes it.
//!
//! [`ContractCatalog`]: super::ContractCatalog

use crate::domain::errors::{ContractError, ContractResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version block a service expects on every request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceVersion {
    /// Service identifier (for example `crs` for rating).
    pub service_id: String,
    /// Major version.
    pub major: u32,
    /// Intermediate version.
    #[serde(default)]
    pub intermediate: u32,
    /// Minor version.
    #[serde(default)]
    pub minor: u32,
}

impl fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{}.{}.{}",
            self.service_id, self.major, self.intermediate, self.minor
        )
    }
}

/// An operation the service exposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationDef {
    /// Operation name, used as the transport path.
    pub name: String,
    /// Root request type.
    pub input: String,
    /// Root reply type.
    pub output: String,
}

/// A field entry of a complex type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDocument {
    /// Field name.
    pub name: String,
    /// Primitive name (`string`, `int`, `decimal`, ...) or contract type name.
    #[serde(rename = "type")]
    pub type_ref: String,
    /// Whether the field must be populated.
    #[serde(default)]
    pub required: bool,
    /// Whether the field is a sequence.
    #[serde(default)]
    pub repeated: bool,
}

/// A named type entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDocument {
    /// A structure with named fields.
    Complex {
        /// Type name.
        name: String,
        /// Fields in declaration order.
        #[serde(default)]
        fields: Vec<FieldDocument>,
    },
    /// A closed set of string constants.
    Enumeration {
        /// Type name.
        name: String,
        /// Constants in declaration order.
        values: Vec<String>,
    },
}

impl TypeDocument {
    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Complex { name, .. } | Self::Enumeration { name, .. } => name,
        }
    }
}

/// A complete contract description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDocument {
    /// Service name.
    pub service: String,
    /// Version block requests must carry.
    #[serde(default)]
    pub version: Option<ServiceVersion>,
    /// Exposed operations.
    #[serde(default)]
    pub operations: Vec<OperationDef>,
    /// Named types.
    pub types: Vec<TypeDocument>,
}

impl ContractDocument {
    /// Parses a contract description from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidContract` if the JSON does not describe
    /// a contract.
    pub fn from_json(json: &str) -> ContractResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            ContractError::invalid_contract(format!("malformed contract description: {}", e))
        })
    }
}
