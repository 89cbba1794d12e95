//! # Contract Types
//!
//! Schema descriptors for the named types a service contract declares.
//!
//! A [`ContractType`] is either a complex type with an ordered field table or
//! an enumeration with a closed set of constants. Field tables are fixed once
//! the contract is loaded; lookups of undeclared names fail with
//! [`ContractError::UnknownField`].

use crate::domain::errors::{ContractError, ContractResult};
use std::collections::HashMap;
use std::fmt;

/// Primitive value kinds a field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Free text (`xsd:string`).
    String,
    /// Whole number (`xsd:int`, `xsd:long`, `xsd:integer`).
    Integer,
    /// Whole number of zero or more (`xsd:nonNegativeInteger`, `xsd:unsignedInt`).
    NonNegativeInteger,
    /// Whole number of one or more (`xsd:positiveInteger`).
    PositiveInteger,
    /// Exact decimal (`xsd:decimal`).
    Decimal,
    /// Boolean flag.
    Boolean,
    /// Date and time (`xsd:dateTime`).
    Timestamp,
}

impl PrimitiveKind {
    /// Maps a contract type reference to a primitive kind.
    ///
    /// Returns `None` when the reference names a contract type instead.
    #[must_use]
    pub fn from_type_ref(name: &str) -> Option<Self> {
        match name {
            "string" | "token" => Some(Self::String),
            "int" | "integer" | "long" => Some(Self::Integer),
            "nonNegativeInteger" | "unsignedInt" | "unsignedLong" => {
                Some(Self::NonNegativeInteger)
            }
            "positiveInteger" => Some(Self::PositiveInteger),
            "decimal" | "double" | "float" => Some(Self::Decimal),
            "boolean" => Some(Self::Boolean),
            "dateTime" | "timestamp" => Some(Self::Timestamp),
            _ => None,
        }
    }

    /// Returns a short name for error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::NonNegativeInteger => "non-negative integer",
            Self::PositiveInteger => "positive integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
        }
    }

    /// Returns true if `value` lies in the range of an integer kind.
    ///
    /// Always false for the non-integer kinds.
    #[must_use]
    pub const fn admits_integer(self, value: i64) -> bool {
        match self {
            Self::Integer => true,
            Self::NonNegativeInteger => value >= 0,
            Self::PositiveInteger => value > 0,
            Self::String | Self::Decimal | Self::Boolean | Self::Timestamp => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared shape of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A primitive value.
    Primitive(PrimitiveKind),
    /// One constant of the named enumeration type.
    Enumeration(String),
    /// An object of the named complex type.
    Nested(String),
    /// An ordered sequence of objects (or constants) of the named type.
    Repeated(String),
}

impl FieldKind {
    /// Returns the contract type this field refers to, if any.
    #[must_use]
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            Self::Primitive(_) => None,
            Self::Enumeration(name) | Self::Nested(name) | Self::Repeated(name) => Some(name),
        }
    }

    /// Returns true for sequence fields.
    #[inline]
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        matches!(self, Self::Repeated(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{}", kind),
            Self::Enumeration(name) => write!(f, "enumeration {}", name),
            Self::Nested(name) => write!(f, "object {}", name),
            Self::Repeated(name) => write!(f, "sequence of {}", name),
        }
    }
}

/// A named field of a complex type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    required: bool,
}

impl FieldDef {
    /// Creates an optional field.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }

    /// Marks the field as required (`minOccurs >= 1`).
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns the field name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared shape.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns true if the contract requires a value.
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Shape of a contract type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A structure with an ordered field table.
    Complex(Vec<FieldDef>),
    /// A closed, ordered set of string constants.
    Enumeration(Vec<String>),
}

/// A named schema entry of a service contract.
///
/// # Examples
///
/// ```
/// use carrier_rate::domain::contract::{ContractType, FieldDef, FieldKind, PrimitiveKind};
///
/// let weight = ContractType::complex(
///     "Weight",
///     vec![
///         FieldDef::new("Units", FieldKind::Enumeration("WeightUnits".into())).required(),
///         FieldDef::new("Value", FieldKind::Primitive(PrimitiveKind::Decimal)).required(),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(weight.fields().len(), 2);
/// assert!(weight.field("Value").is_ok());
/// assert!(weight.field("Colour").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractType {
    name: String,
    shape: TypeShape,
    positions: HashMap<String, usize>,
}

impl ContractType {
    /// Creates a complex type.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidContract` if two fields share a name.
    pub fn complex(name: impl Into<String>, fields: Vec<FieldDef>) -> ContractResult<Self> {
        let name = name.into();
        let mut positions = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if positions.insert(field.name.clone(), position).is_some() {
                return Err(ContractError::invalid_contract(format!(
                    "type {} declares field {} twice",
                    name, field.name
                )));
            }
        }
        Ok(Self {
            name,
            shape: TypeShape::Complex(fields),
            positions,
        })
    }

    /// Creates an enumeration type.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidContract` if there are no constants or
    /// a constant is repeated.
    pub fn enumeration(name: impl Into<String>, values: Vec<String>) -> ContractResult<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(ContractError::invalid_contract(format!(
                "enumeration {} declares no constants",
                name
            )));
        }
        let mut positions = HashMap::with_capacity(values.len());
        for (position, value) in values.iter().enumerate() {
            if positions.insert(value.clone(), position).is_some() {
                return Err(ContractError::invalid_contract(format!(
                    "enumeration {} declares constant {} twice",
                    name, value
                )));
            }
        }
        Ok(Self {
            name,
            shape: TypeShape::Enumeration(values),
            positions,
        })
    }

    /// Returns the type name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type shape.
    #[inline]
    #[must_use]
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Returns true for enumeration types.
    #[inline]
    #[must_use]
    pub fn is_enumeration(&self) -> bool {
        matches!(self.shape, TypeShape::Enumeration(_))
    }

    /// Returns the declared fields in order; empty for enumerations.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        match &self.shape {
            TypeShape::Complex(fields) => fields,
            TypeShape::Enumeration(_) => &[],
        }
    }

    /// Returns the legal constants in order; empty for complex types.
    #[must_use]
    pub fn constants(&self) -> &[String] {
        match &self.shape {
            TypeShape::Complex(_) => &[],
            TypeShape::Enumeration(values) => values,
        }
    }

    /// Returns true if `value` is one of this enumeration's constants.
    #[must_use]
    pub fn has_constant(&self, value: &str) -> bool {
        self.is_enumeration() && self.positions.contains_key(value)
    }

    /// Returns the position of a field in the field table.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` if the field is not declared.
    pub fn position(&self, field: &str) -> ContractResult<usize> {
        if self.is_enumeration() {
            return Err(ContractError::unknown_field(&self.name, field));
        }
        self.positions
            .get(field)
            .copied()
            .ok_or_else(|| ContractError::unknown_field(&self.name, field))
    }

    /// Returns a field definition by name.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` if the field is not declared.
    pub fn field(&self, field: &str) -> ContractResult<&FieldDef> {
        let position = self.position(field)?;
        self.fields()
            .get(position)
            .ok_or_else(|| ContractError::unknown_field(&self.name, field))
    }

    /// Iterates over required fields in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields().iter().filter(|f| f.is_required())
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            TypeShape::Complex(fields) => write!(f, "{} ({} fields)", self.name, fields.len()),
            TypeShape::Enumeration(values) => {
                write!(f, "{} ({} constants)", self.name, values.len())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> ContractType {
        ContractType::complex(
            "Address",
            vec![
                FieldDef::new("PostalCode", FieldKind::Primitive(PrimitiveKind::String)),
                FieldDef::new("CountryCode", FieldKind::Primitive(PrimitiveKind::String))
                    .required(),
                FieldDef::new("Residential", FieldKind::Primitive(PrimitiveKind::Boolean)),
            ],
        )
        .unwrap()
    }

    mod primitive_kind {
        use super::*;

        #[test]
        fn maps_xsd_names() {
            assert_eq!(PrimitiveKind::from_type_ref("int"), Some(PrimitiveKind::Integer));
            assert_eq!(
                PrimitiveKind::from_type_ref("dateTime"),
                Some(PrimitiveKind::Timestamp)
            );
            assert_eq!(PrimitiveKind::from_type_ref("Weight"), None);
        }

        #[test]
        fn unsigned_references_keep_their_range() {
            assert_eq!(
                PrimitiveKind::from_type_ref("nonNegativeInteger"),
                Some(PrimitiveKind::NonNegativeInteger)
            );
            assert_eq!(
                PrimitiveKind::from_type_ref("unsignedInt"),
                Some(PrimitiveKind::NonNegativeInteger)
            );
            assert_eq!(
                PrimitiveKind::from_type_ref("positiveInteger"),
                Some(PrimitiveKind::PositiveInteger)
            );
            assert_eq!(PrimitiveKind::PositiveInteger.to_string(), "positive integer");
        }

        #[test]
        fn integer_ranges() {
            assert!(PrimitiveKind::Integer.admits_integer(-5));
            assert!(PrimitiveKind::NonNegativeInteger.admits_integer(0));
            assert!(!PrimitiveKind::NonNegativeInteger.admits_integer(-1));
            assert!(PrimitiveKind::PositiveInteger.admits_integer(1));
            assert!(!PrimitiveKind::PositiveInteger.admits_integer(0));
            assert!(!PrimitiveKind::Decimal.admits_integer(1));
        }
    }

    mod complex {
        use super::*;

        #[test]
        fn keeps_declaration_order() {
            let ty = address();
            let names: Vec<&str> = ty.fields().iter().map(FieldDef::name).collect();
            assert_eq!(names, vec!["PostalCode", "CountryCode", "Residential"]);
        }

        #[test]
        fn field_lookup() {
            let ty = address();
            assert_eq!(ty.position("Residential").unwrap(), 2);
            assert!(ty.field("CountryCode").unwrap().is_required());
        }

        #[test]
        fn unknown_field_is_rejected() {
            let err = address().field("Zip").unwrap_err();
            assert_eq!(err, ContractError::unknown_field("Address", "Zip"));
        }

        #[test]
        fn duplicate_field_is_invalid() {
            let result = ContractType::complex(
                "Dup",
                vec![
                    FieldDef::new("A", FieldKind::Primitive(PrimitiveKind::String)),
                    FieldDef::new("A", FieldKind::Primitive(PrimitiveKind::Integer)),
                ],
            );
            assert!(matches!(result, Err(ContractError::InvalidContract { .. })));
        }

        #[test]
        fn required_fields() {
            let ty = address();
            let required: Vec<&str> = ty.required_fields().map(FieldDef::name).collect();
            assert_eq!(required, vec!["CountryCode"]);
        }
    }

    mod enumeration {
        use super::*;

        #[test]
        fn constants_and_membership() {
            let ty =
                ContractType::enumeration("WeightUnits", vec!["KG".into(), "LB".into()]).unwrap();
            assert!(ty.is_enumeration());
            assert!(ty.has_constant("LB"));
            assert!(!ty.has_constant("OZ"));
            assert!(ty.fields().is_empty());
        }

        #[test]
        fn constants_are_not_fields() {
            let ty =
                ContractType::enumeration("WeightUnits", vec!["KG".into(), "LB".into()]).unwrap();
            assert!(ty.field("KG").is_err());
        }

        #[test]
        fn empty_enumeration_is_invalid() {
            assert!(ContractType::enumeration("Nothing", vec![]).is_err());
        }
    }

    #[test]
    fn field_kind_display() {
        assert_eq!(
            FieldKind::Repeated("RequestedPackageLineItem".into()).to_string(),
            "sequence of RequestedPackageLineItem"
        );
        assert_eq!(
            FieldKind::Primitive(PrimitiveKind::Decimal).to_string(),
            "decimal"
        );
    }
}
