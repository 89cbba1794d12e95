//! # Object Factory
//!
//! Creates empty typed objects from a contract catalog.

use super::object::TypedObject;
use super::value::Value;
use crate::domain::contract::ContractCatalog;
use crate::domain::errors::ContractResult;
use std::sync::Arc;

/// Produces [`TypedObject`]s for the types of one contract.
///
/// Cheap to clone; all clones share the catalog.
#[derive(Debug, Clone)]
pub struct ObjectFactory {
    catalog: Arc<ContractCatalog>,
}

impl ObjectFactory {
    /// Creates a factory over a catalog.
    #[must_use]
    pub fn new(catalog: Arc<ContractCatalog>) -> Self {
        Self { catalog }
    }

    /// Returns the catalog.
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Arc<ContractCatalog> {
        &self.catalog
    }

    /// Creates an instance of `type_name` with every field unset.
    ///
    /// Enumeration types yield a field-less object exposing their constants.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownType` if the contract declares no such type.
    pub fn create(&self, type_name: &str) -> ContractResult<TypedObject> {
        let contract_type = self.catalog.resolve(type_name)?;
        Ok(TypedObject::empty(Arc::clone(&self.catalog), contract_type))
    }

    /// Selects a constant of an enumeration type.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownType` for an undeclared type,
    /// `ContractError::ShapeMismatch` if the type is not an enumeration and
    /// `ContractError::UnknownField` if the constant is not declared.
    pub fn constant(&self, enum_type: &str, name: &str) -> ContractResult<Value> {
        self.create(enum_type)?.constant(name)
    }

    /// Populates every object along `path` inside `object`, returning the
    /// innermost one.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UnknownField` for an undeclared segment and
    /// `ContractError::ShapeMismatch` if a segment is not an object field.
    pub fn materialize<'a>(
        &self,
        object: &'a mut TypedObject,
        path: &str,
    ) -> ContractResult<&'a mut TypedObject> {
        object.object_at_mut(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ContractError;
    use serde_json::json;

    fn factory() -> ObjectFactory {
        let contract = json!({
            "service": "RateService",
            "types": [
                { "kind": "enumeration", "name": "PackagingType",
                  "values": ["FEDEX_BOX", "YOUR_PACKAGING"] },
                { "kind": "complex", "name": "Address", "fields": [
                    { "name": "StateOrProvinceCode", "type": "string" }
                ] },
                { "kind": "complex", "name": "Party", "fields": [
                    { "name": "Address", "type": "Address" }
                ] }
            ]
        });
        ObjectFactory::new(Arc::new(
            ContractCatalog::from_json(&contract.to_string()).unwrap(),
        ))
    }

    #[test]
    fn creates_empty_objects() {
        let party = factory().create("Party").unwrap();
        assert_eq!(party.type_name(), "Party");
        assert!(!party.is_set("Address").unwrap());
    }

    #[test]
    fn unknown_type() {
        assert_eq!(
            factory().create("Parcel").unwrap_err(),
            ContractError::unknown_type("Parcel")
        );
    }

    #[test]
    fn instances_are_independent() {
        let factory = factory();
        let mut first = factory.create("Address").unwrap();
        let second = factory.create("Address").unwrap();
        first.set("StateOrProvinceCode", "SC").unwrap();
        assert!(!second.is_set("StateOrProvinceCode").unwrap());
    }

    #[test]
    fn selects_constants() {
        let factory = factory();
        assert_eq!(
            factory.constant("PackagingType", "YOUR_PACKAGING").unwrap(),
            Value::Enum("YOUR_PACKAGING".into())
        );
        assert!(factory.constant("PackagingType", "ENVELOPE").is_err());
        assert!(factory.constant("Party", "Address").unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn materializes_paths() {
        let factory = factory();
        let mut party = factory.create("Party").unwrap();
        factory
            .materialize(&mut party, "Address")
            .unwrap()
            .set("StateOrProvinceCode", "NC")
            .unwrap();
        assert_eq!(
            party.get_path("Address.StateOrProvinceCode").unwrap().and_then(Value::as_str),
            Some("NC")
        );
    }

    mod bundled_contract {
        use super::*;
        use crate::infrastructure::contract::RATE_SERVICE_CONTRACT;

        fn rate_factory() -> ObjectFactory {
            ObjectFactory::new(Arc::new(
                ContractCatalog::from_json(RATE_SERVICE_CONTRACT).unwrap(),
            ))
        }

        #[test]
        fn every_type_starts_empty() {
            let factory = rate_factory();
            let catalog = Arc::clone(factory.catalog());
            for name in catalog.type_names() {
                let object = factory.create(name).unwrap();
                let declared = catalog.resolve(name).unwrap();
                assert_eq!(
                    object.field_names().collect::<Vec<_>>(),
                    declared.fields().iter().map(|f| f.name()).collect::<Vec<_>>(),
                    "{name}"
                );
                for (def, value) in object.fields() {
                    if def.kind().is_repeated() {
                        assert_eq!(value, &Value::List(vec![]), "{name}.{}", def.name());
                    } else {
                        assert!(value.is_unset(), "{name}.{}", def.name());
                    }
                }
            }
        }

        #[test]
        fn counts_respect_their_range() {
            let factory = rate_factory();
            let mut shipment = factory.create("RequestedShipment").unwrap();
            assert!(shipment.set("PackageCount", -1).unwrap_err().is_shape_mismatch());
            shipment.set("PackageCount", 0).unwrap();

            let mut package = factory.create("RequestedPackageLineItem").unwrap();
            assert!(package.set("SequenceNumber", 0).unwrap_err().is_shape_mismatch());
            assert!(!package.is_set("SequenceNumber").unwrap());
            package.set("SequenceNumber", 1).unwrap();
            assert_eq!(package.get("SequenceNumber").unwrap().as_integer(), Some(1));
        }
    }
}
