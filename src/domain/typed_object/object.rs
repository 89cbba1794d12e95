//! # Typed Objects
//!
//! Contract-shaped structural values.
//!
//! A [`TypedObject`] holds one [`Value`] slot per field its [`ContractType`]
//! declares, in declaration order. Fields are read and written by name; names
//! the contract does not declare are rejected rather than created, and every
//! write is checked against the declared shape before the object changes.
//!
//! Objects created for an enumeration type carry no fields. They expose the
//! enumeration's constants through [`TypedObject::constants`] and
//! [`TypedObject::constant`].

use super::value::Value;
use crate::domain::contract::{ContractCatalog, ContractType, FieldDef, FieldKind, PrimitiveKind};
use crate::domain::errors::{ContractError, ContractResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::sync::Arc;

/// An instance of a contract type.
///
/// # Examples
///
/// ```
/// use carrier_rate::domain::contract::ContractCatalog;
/// use carrier_rate::domain::typed_object::{ObjectFactory, Value};
/// use carrier_rate::infrastructure::contract::RATE_SERVICE_CONTRACT;
/// use std::sync::Arc;
///
/// let catalog = ContractCatalog::from_json(RATE_SERVICE_CONTRACT).unwrap();
/// let factory = ObjectFactory::new(Arc::new(catalog));
/// let mut package = factory.create("RequestedPackageLineItem").unwrap();
///
/// package.set_path("Weight.Units", "LB").unwrap();
/// package.set("GroupPackageCount", 1).unwrap();
///
/// assert_eq!(package.get_path("Weight.Units").unwrap(), Some(&Value::Enum("LB".into())));
/// assert!(package.set("GroupPackageCount", "one").is_err());
/// ```
#[derive(Clone)]
pub struct TypedObject {
    catalog: Arc<ContractCatalog>,
    contract_type: Arc<ContractType>,
    values: Vec<Value>,
}

impl TypedObject {
    /// Creates an object with every field unset (sequences empty).
    pub(crate) fn empty(catalog: Arc<ContractCatalog>, contract_type: Arc<ContractType>) -> Self {
        let values = contract_type
            .fields()
            .iter()
            .map(|field| {
                if field.kind().is_repeated() {
                    Value::List(Vec::new())
                } else {
                    Value::Unset
                }
            })
            .collect();
        Self {
            catalog,
            contract_type,
            values,
        }
    }

    /// Returns the contract type name.
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.contract_type.name()
    }

    /// Returns the contract type.
    #[inline]
    #[must_use]
    pub fn contract_type(&self) -> &Arc<ContractType> {
        &self.contract_type
    }

    /// Returns true if this is a `type_name` object drawn from `catalog` or
    /// from a catalog with the same type graph.
    #[must_use]
    pub fn conforms_to(&self, catalog: &Arc<ContractCatalog>, type_name: &str) -> bool {
        self.type_name() == type_name
            && (Arc::ptr_eq(&self.catalog, catalog) || *self.catalog == **catalog)
    }

    /// Iterates over declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.contract_type.fields().iter().map(FieldDef::name)
    }

    /// Iterates over field definitions paired with their current values.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDef, &Value)> {
        self.contract_type.fields().iter().zip(self.values.iter())
    }

    /// Returns a field's current value.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` if the field is not declared.
    pub fn get(&self, field: &str) -> ContractResult<&Value> {
        let position = self.contract_type.position(field)?;
        self.values
            .get(position)
            .ok_or_else(|| ContractError::unknown_field(self.type_name(), field))
    }

    /// Returns true if the field holds a value (a non-empty sequence for
    /// repeated fields).
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` if the field is not declared.
    pub fn is_set(&self, field: &str) -> ContractResult<bool> {
        self.get(field).map(Value::is_present)
    }

    /// Assigns a field, checking the value against the declared shape.
    ///
    /// Text is accepted for enumeration fields when it names a legal
    /// constant, and integers are widened for decimal fields. Assigning
    /// [`Value::Unset`] clears the field.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared field and
    /// `ContractError::ShapeMismatch` for a value of the wrong shape. The
    /// object is unchanged on error.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> ContractResult<()> {
        let contract_type = Arc::clone(&self.contract_type);
        let position = contract_type.position(field)?;
        let def = contract_type.field(field)?;
        let checked = self.check(def, value.into())?;
        let slot = self.slot_mut(position, field)?;
        *slot = checked;
        Ok(())
    }

    /// Resets a field to unset (an empty sequence for repeated fields).
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` if the field is not declared.
    pub fn clear(&mut self, field: &str) -> ContractResult<()> {
        self.set(field, Value::Unset)
    }

    /// Returns a nested object, or `None` while the field is unset.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared field and
    /// `ContractError::ShapeMismatch` if the field is not a nested object.
    pub fn object(&self, field: &str) -> ContractResult<Option<&TypedObject>> {
        let def = self.contract_type.field(field)?;
        if !matches!(def.kind(), FieldKind::Nested(_)) {
            return Err(self.mismatch(def, "object field"));
        }
        Ok(self.get(field)?.as_object())
    }

    /// Returns a nested object for in-place population, creating an empty
    /// one first if the field is unset.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared field and
    /// `ContractError::ShapeMismatch` if the field is not a nested object.
    pub fn object_mut(&mut self, field: &str) -> ContractResult<&mut TypedObject> {
        let contract_type = Arc::clone(&self.contract_type);
        let position = contract_type.position(field)?;
        let def = contract_type.field(field)?;
        let FieldKind::Nested(nested_type) = def.kind() else {
            return Err(self.mismatch(def, "object field"));
        };

        let catalog = Arc::clone(&self.catalog);
        let slot = self.slot_mut(position, field)?;
        if slot.is_unset() {
            let nested = catalog.resolve(nested_type)?;
            *slot = Value::Object(TypedObject::empty(Arc::clone(&catalog), nested));
        }
        match slot {
            Value::Object(object) => Ok(object),
            other => Err(ContractError::shape_mismatch(
                contract_type.name(),
                field,
                def.kind().to_string(),
                other.kind_name(),
            )),
        }
    }

    /// Appends an element to a repeated field.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared field and
    /// `ContractError::ShapeMismatch` if the field is not repeated or the
    /// element has the wrong type. The sequence is unchanged on error.
    pub fn push(&mut self, field: &str, value: impl Into<Value>) -> ContractResult<()> {
        let contract_type = Arc::clone(&self.contract_type);
        let position = contract_type.position(field)?;
        let def = contract_type.field(field)?;
        let FieldKind::Repeated(element_type) = def.kind() else {
            return Err(self.mismatch(def, "sequence field"));
        };
        let element = self.check_element(def, element_type, value.into())?;

        let slot = self.slot_mut(position, field)?;
        match slot {
            Value::List(items) => items.push(element),
            other => *other = Value::List(vec![element]),
        }
        Ok(())
    }

    /// Returns the elements of a repeated field.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared field and
    /// `ContractError::ShapeMismatch` if the field is not repeated.
    pub fn items(&self, field: &str) -> ContractResult<&[Value]> {
        let def = self.contract_type.field(field)?;
        if !def.kind().is_repeated() {
            return Err(self.mismatch(def, "sequence field"));
        }
        Ok(self.get(field)?.as_list().unwrap_or(&[]))
    }

    /// Lists the legal constants of an enumeration field (or of the elements
    /// of a repeated enumeration field).
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared field and
    /// `ContractError::ShapeMismatch` if the field does not hold constants.
    pub fn enum_constants(&self, field: &str) -> ContractResult<&[String]> {
        let def = self.contract_type.field(field)?;
        let type_name = match def.kind() {
            FieldKind::Enumeration(name) | FieldKind::Repeated(name) => name,
            _ => return Err(self.mismatch(def, "enumeration field")),
        };
        let constants = self.catalog.constants(type_name)?;
        if constants.is_empty() {
            return Err(self.mismatch(def, "enumeration field"));
        }
        Ok(constants)
    }

    /// Returns the constants of an enumeration-typed object; empty for
    /// complex objects.
    #[must_use]
    pub fn constants(&self) -> &[String] {
        self.contract_type.constants()
    }

    /// Selects a constant of an enumeration-typed object.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ShapeMismatch` if this object is not an
    /// enumeration and `ContractError::UnknownField` if the constant is not
    /// declared.
    pub fn constant(&self, name: &str) -> ContractResult<Value> {
        if !self.contract_type.is_enumeration() {
            return Err(ContractError::shape_mismatch(
                self.type_name(),
                name,
                "enumeration type",
                format!("object {}", self.type_name()),
            ));
        }
        if self.contract_type.has_constant(name) {
            Ok(Value::Enum(name.to_string()))
        } else {
            Err(ContractError::unknown_field(self.type_name(), name))
        }
    }

    /// Reads a value through a dotted path such as `Shipper.Address.PostalCode`.
    ///
    /// Returns `Ok(None)` when an intermediate object is still unset.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared segment and
    /// `ContractError::ShapeMismatch` if an intermediate segment is not an
    /// object field.
    pub fn get_path(&self, path: &str) -> ContractResult<Option<&Value>> {
        let Some((parents, leaf)) = path.rsplit_once('.') else {
            return self.get(path).map(Some);
        };
        let mut current = self;
        for segment in parents.split('.') {
            match current.object(segment)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        current.get(leaf).map(Some)
    }

    /// Returns the object at a dotted path, creating unset objects on the way.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared segment and
    /// `ContractError::ShapeMismatch` if a segment is not an object field.
    pub fn object_at_mut(&mut self, path: &str) -> ContractResult<&mut TypedObject> {
        let mut current = self;
        for segment in path.split('.') {
            current = current.object_mut(segment)?;
        }
        Ok(current)
    }

    /// Assigns a value through a dotted path, creating unset objects on the way.
    ///
    /// # Errors
    ///
    /// Same as [`TypedObject::object_at_mut`] and [`TypedObject::set`].
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) -> ContractResult<()> {
        match path.rsplit_once('.') {
            Some((parent, leaf)) => self.object_at_mut(parent)?.set(leaf, value),
            None => self.set(path, value),
        }
    }

    /// Returns required fields that hold no value, in declaration order.
    #[must_use]
    pub fn missing_required_fields(&self) -> Vec<&str> {
        self.fields()
            .filter(|(def, value)| def.is_required() && !value.is_present())
            .map(|(def, _)| def.name())
            .collect()
    }

    fn slot_mut(&mut self, position: usize, field: &str) -> ContractResult<&mut Value> {
        let Self {
            contract_type,
            values,
            ..
        } = self;
        values
            .get_mut(position)
            .ok_or_else(|| ContractError::unknown_field(contract_type.name(), field))
    }

    fn mismatch(&self, def: &FieldDef, found: &str) -> ContractError {
        ContractError::shape_mismatch(self.type_name(), def.name(), def.kind().to_string(), found)
    }

    fn mismatched_value(&self, def: &FieldDef, value: &Value) -> ContractError {
        self.mismatch(def, &value.kind_name())
    }

    fn check(&self, def: &FieldDef, value: Value) -> ContractResult<Value> {
        if value.is_unset() {
            return Ok(if def.kind().is_repeated() {
                Value::List(Vec::new())
            } else {
                Value::Unset
            });
        }

        match def.kind() {
            FieldKind::Primitive(kind) => check_primitive(*kind, value)
                .map_err(|rejected| self.mismatched_value(def, &rejected)),
            FieldKind::Enumeration(type_name) => self.check_constant(def, type_name, value),
            FieldKind::Nested(type_name) => match value {
                Value::Object(object) if object.conforms_to(&self.catalog, type_name) => {
                    Ok(Value::Object(object))
                }
                other => Err(self.mismatched_value(def, &other)),
            },
            FieldKind::Repeated(element_type) => match value {
                Value::List(items) => items
                    .into_iter()
                    .map(|item| self.check_element(def, element_type, item))
                    .collect::<ContractResult<Vec<_>>>()
                    .map(Value::List),
                other => Err(self.mismatched_value(def, &other)),
            },
        }
    }

    fn check_element(
        &self,
        def: &FieldDef,
        element_type: &str,
        value: Value,
    ) -> ContractResult<Value> {
        let element = self.catalog.resolve(element_type)?;
        if element.is_enumeration() {
            return self.check_constant(def, element_type, value);
        }
        match value {
            Value::Object(object) if object.conforms_to(&self.catalog, element_type) => {
                Ok(Value::Object(object))
            }
            other => Err(self.mismatched_value(def, &other)),
        }
    }

    fn check_constant(
        &self,
        def: &FieldDef,
        enum_type: &str,
        value: Value,
    ) -> ContractResult<Value> {
        let enumeration = self.catalog.resolve(enum_type)?;
        match value {
            Value::Text(constant) | Value::Enum(constant)
                if enumeration.has_constant(&constant) =>
            {
                Ok(Value::Enum(constant))
            }
            other => Err(self.mismatched_value(def, &other)),
        }
    }
}

fn check_primitive(kind: PrimitiveKind, value: Value) -> Result<Value, Value> {
    match (kind, value) {
        (
            PrimitiveKind::Integer
            | PrimitiveKind::NonNegativeInteger
            | PrimitiveKind::PositiveInteger,
            Value::Integer(i),
        ) if kind.admits_integer(i) => Ok(Value::Integer(i)),
        (PrimitiveKind::String, value @ Value::Text(_))
        | (PrimitiveKind::Decimal, value @ Value::Decimal(_))
        | (PrimitiveKind::Boolean, value @ Value::Boolean(_))
        | (PrimitiveKind::Timestamp, value @ Value::Timestamp(_)) => Ok(value),
        (PrimitiveKind::Decimal, Value::Integer(i)) => Ok(Value::Decimal(i.into())),
        (_, other) => Err(other),
    }
}

impl PartialEq for TypedObject {
    fn eq(&self, other: &Self) -> bool {
        self.contract_type == other.contract_type && self.values == other.values
    }
}

impl fmt::Debug for TypedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (def, value) in self.fields().filter(|(_, value)| value.is_present()) {
            map.entry(&def.name(), value);
        }
        map.finish()?;
        write!(f, " as {}", self.type_name())
    }
}

impl Serialize for TypedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<(&FieldDef, &Value)> =
            self.fields().filter(|(_, value)| value.is_present()).collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (def, value) in present {
            map.serialize_entry(def.name(), value)?;
        }
        map.end()
    }
}
