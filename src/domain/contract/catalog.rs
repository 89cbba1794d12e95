//! # Contract Catalog
//!
//! Validated, indexed view of one loaded service contract.
//!
//! A catalog is built once per contract and never mutated afterwards, so it
//! can be shared across builders and threads behind an `Arc`. Every type is
//! resolved at build time; [`ContractCatalog::resolve`] hands out the same
//! `Arc<ContractType>` on every call.

use super::contract_type::{ContractType, FieldDef, FieldKind, PrimitiveKind};
use super::document::{ContractDocument, OperationDef, ServiceVersion, TypeDocument};
use crate::domain::errors::{ContractError, ContractResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type and operation lookup for one service contract.
///
/// # Examples
///
/// ```
/// use carrier_rate::domain::contract::ContractCatalog;
/// use carrier_rate::infrastructure::contract::RATE_SERVICE_CONTRACT;
///
/// let catalog = ContractCatalog::from_json(RATE_SERVICE_CONTRACT).unwrap();
///
/// let weight = catalog.resolve("Weight").unwrap();
/// assert!(weight.field("Units").is_ok());
/// assert!(catalog.resolve("Parcel").is_err());
/// assert_eq!(catalog.operation("getRates").unwrap().input, "RateRequest");
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct ContractCatalog {
    service: String,
    version: Option<ServiceVersion>,
    types: HashMap<String, Arc<ContractType>>,
    operations: HashMap<String, OperationDef>,
}

impl ContractCatalog {
    /// Parses and validates a JSON contract description.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidContract` if the description is
    /// malformed or inconsistent.
    pub fn from_json(json: &str) -> ContractResult<Self> {
        Self::from_document(ContractDocument::from_json(json)?)
    }

    /// Validates and indexes a contract document.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidContract` if a type name is declared
    /// twice, a field references an undeclared type, a sequence holds
    /// primitives, or an operation names a missing or enumeration root type.
    pub fn from_document(document: ContractDocument) -> ContractResult<Self> {
        let ContractDocument {
            service,
            version,
            operations,
            types: type_documents,
        } = document;

        // name -> is_enumeration, used to resolve field references
        let mut declared: HashMap<String, bool> = HashMap::with_capacity(type_documents.len());
        for doc in &type_documents {
            let is_enumeration = matches!(doc, TypeDocument::Enumeration { .. });
            if declared.insert(doc.name().to_string(), is_enumeration).is_some() {
                return Err(ContractError::invalid_contract(format!(
                    "type {} is declared twice",
                    doc.name()
                )));
            }
        }

        let mut types = HashMap::with_capacity(type_documents.len());
        for doc in type_documents {
            let contract_type = match doc {
                TypeDocument::Enumeration { name, values } => {
                    ContractType::enumeration(name, values)?
                }
                TypeDocument::Complex { name, fields } => {
                    let mut defs = Vec::with_capacity(fields.len());
                    for field in fields {
                        let kind = resolve_field_kind(
                            &declared,
                            &name,
                            &field.name,
                            &field.type_ref,
                            field.repeated,
                        )?;
                        let def = FieldDef::new(field.name, kind);
                        defs.push(if field.required { def.required() } else { def });
                    }
                    ContractType::complex(name, defs)?
                }
            };
            types.insert(contract_type.name().to_string(), Arc::new(contract_type));
        }

        let mut operation_index = HashMap::with_capacity(operations.len());
        for operation in operations {
            match declared.get(&operation.input) {
                Some(false) => {}
                Some(true) => {
                    return Err(ContractError::invalid_contract(format!(
                        "operation {} takes enumeration {} as input",
                        operation.name, operation.input
                    )));
                }
                None => {
                    return Err(ContractError::invalid_contract(format!(
                        "operation {} references undeclared input type {}",
                        operation.name, operation.input
                    )));
                }
            }
            if !declared.contains_key(&operation.output) {
                return Err(ContractError::invalid_contract(format!(
                    "operation {} references undeclared output type {}",
                    operation.name, operation.output
                )));
            }
            operation_index.insert(operation.name.clone(), operation);
        }

        Ok(Self {
            service,
            version,
            types,
            operations: operation_index,
        })
    }

    /// Returns the service name.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service
    }

    /// Returns the version block requests must carry, if the contract has one.
    #[inline]
    #[must_use]
    pub fn version(&self) -> Option<&ServiceVersion> {
        self.version.as_ref()
    }

    /// Resolves a type by name.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownType` if the contract declares no such type.
    pub fn resolve(&self, type_name: &str) -> ContractResult<Arc<ContractType>> {
        self.types
            .get(type_name)
            .cloned()
            .ok_or_else(|| ContractError::unknown_type(type_name))
    }

    /// Returns the constants of an enumeration type; empty for complex types.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownType` if the contract declares no such type.
    pub fn constants(&self, type_name: &str) -> ContractResult<&[String]> {
        self.types
            .get(type_name)
            .map(|contract_type| contract_type.constants())
            .ok_or_else(|| ContractError::unknown_type(type_name))
    }

    /// Returns true if the contract declares `type_name`.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Returns an operation by name.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownOperation` if the contract declares no
    /// such operation.
    pub fn operation(&self, name: &str) -> ContractResult<&OperationDef> {
        self.operations
            .get(name)
            .ok_or_else(|| ContractError::unknown_operation(name))
    }

    /// Returns all declared type names, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns all declared operation names, sorted.
    #[must_use]
    pub fn operation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for ContractCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ContractCatalog({}: {} types, {} operations)",
            self.service,
            self.types.len(),
            self.operations.len()
        )
    }
}

fn resolve_field_kind(
    declared: &HashMap<String, bool>,
    owner: &str,
    field: &str,
    type_ref: &str,
    repeated: bool,
) -> ContractResult<FieldKind> {
    if let Some(primitive) = PrimitiveKind::from_type_ref(type_ref) {
        if repeated {
            return Err(ContractError::invalid_contract(format!(
                "{}.{} is a repeated {}; repeated fields must reference a contract type",
                owner, field, primitive
            )));
        }
        return Ok(FieldKind::Primitive(primitive));
    }

    match declared.get(type_ref) {
        None => Err(ContractError::invalid_contract(format!(
            "{}.{} references undeclared type {}",
            owner, field, type_ref
        ))),
        Some(_) if repeated => Ok(FieldKind::Repeated(type_ref.to_string())),
        Some(true) => Ok(FieldKind::Enumeration(type_ref.to_string())),
        Some(false) => Ok(FieldKind::Nested(type_ref.to_string())),
    }
}
