//! # Contract Errors
//!
//! Errors raised while loading a contract or shaping objects against it.
//!
//! These surface immediately at the call that caused them and are not
//! recoverable without a change in caller code (or in the contract).
//!
//! # Examples
//!
//! ```
//! use carrier_rate::domain::errors::ContractError;
//!
//! let err = ContractError::unknown_field("Weight", "Colour");
//! assert!(err.to_string().contains("Colour"));
//! assert!(err.is_unknown_name());
//! ```

use thiserror::Error;

/// Error type for contract and typed-object operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// The contract declares no type with this name.
    #[error("unknown contract type: {type_name}")]
    UnknownType {
        /// The requested type name.
        type_name: String,
    },

    /// The type declares no field with this name.
    #[error("unknown field {field} on type {type_name}")]
    UnknownField {
        /// The type that was accessed.
        type_name: String,
        /// The requested field name.
        field: String,
    },

    /// The contract declares no operation with this name.
    #[error("unknown contract operation: {operation}")]
    UnknownOperation {
        /// The requested operation name.
        operation: String,
    },

    /// A value does not have the shape the contract declares for a field.
    #[error("shape mismatch on {type_name}.{field}: expected {expected}, found {found}")]
    ShapeMismatch {
        /// The type owning the field.
        type_name: String,
        /// The field being written.
        field: String,
        /// The declared shape.
        expected: String,
        /// The shape that was supplied.
        found: String,
    },

    /// The contract description is inconsistent.
    #[error("invalid contract: {message}")]
    InvalidContract {
        /// Error message.
        message: String,
    },

    /// The contract description could not be loaded.
    #[error("failed to load contract from {location}: {message}")]
    ContractLoad {
        /// Where the contract was loaded from.
        location: String,
        /// Error message.
        message: String,
    },
}

impl ContractError {
    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Creates an unknown operation error.
    #[must_use]
    pub fn unknown_operation(operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            operation: operation.into(),
        }
    }

    /// Creates a shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(
        type_name: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::ShapeMismatch {
            type_name: type_name.into(),
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates an invalid contract error.
    #[must_use]
    pub fn invalid_contract(message: impl Into<String>) -> Self {
        Self::InvalidContract {
            message: message.into(),
        }
    }

    /// Creates a contract load error.
    #[must_use]
    pub fn contract_load(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ContractLoad {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Returns true if a type, field or operation name was not found.
    #[must_use]
    pub fn is_unknown_name(&self) -> bool {
        matches!(
            self,
            Self::UnknownType { .. } | Self::UnknownField { .. } | Self::UnknownOperation { .. }
        )
    }

    /// Returns true if a value had the wrong shape.
    #[must_use]
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }
}

/// Result type for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_display() {
        let err = ContractError::unknown_type("Parcel");
        assert_eq!(err.to_string(), "unknown contract type: Parcel");
        assert!(err.is_unknown_name());
    }

    #[test]
    fn shape_mismatch_display() {
        let err = ContractError::shape_mismatch("Weight", "Value", "decimal", "boolean");
        let display = err.to_string();
        assert!(display.contains("Weight.Value"));
        assert!(display.contains("expected decimal"));
        assert!(err.is_shape_mismatch());
        assert!(!err.is_unknown_name());
    }

    #[test]
    fn contract_load_names_location() {
        let err = ContractError::contract_load("/tmp/rate.json", "not found");
        assert!(err.to_string().contains("/tmp/rate.json"));
    }
}
