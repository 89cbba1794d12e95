//! # Field Values
//!
//! The structural value held by one field of a [`TypedObject`].

use super::object::TypedObject;
use crate::domain::value_objects::Timestamp;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Value of a single field.
///
/// `Unset` is the explicit "no value" marker every scalar, enumeration and
/// nested field starts with; repeated fields start as an empty `List`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// No value has been assigned.
    #[default]
    Unset,
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Exact decimal.
    Decimal(Decimal),
    /// Boolean flag.
    Boolean(bool),
    /// Date and time.
    Timestamp(Timestamp),
    /// A constant of an enumeration type.
    Enum(String),
    /// A nested contract-typed object.
    Object(TypedObject),
    /// An ordered sequence of objects or constants.
    List(Vec<Value>),
}

impl Value {
    /// Returns true for the explicit unset marker.
    #[inline]
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns true if the value would be sent on the wire.
    ///
    /// Unset values and empty sequences are omitted.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Unset => false,
            Self::List(items) => !items.is_empty(),
            _ => true,
        }
    }

    /// Returns a short description of the value's shape for error messages.
    #[must_use]
    pub fn kind_name(&self) -> String {
        match self {
            Self::Unset => "unset".to_string(),
            Self::Text(_) => "string".to_string(),
            Self::Integer(_) => "integer".to_string(),
            Self::Decimal(_) => "decimal".to_string(),
            Self::Boolean(_) => "boolean".to_string(),
            Self::Timestamp(_) => "timestamp".to_string(),
            Self::Enum(constant) => format!("constant {}", constant),
            Self::Object(object) => format!("object {}", object.type_name()),
            Self::List(_) => "sequence".to_string(),
        }
    }

    /// Returns the text of a `Text` or `Enum` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Integer`.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the decimal, if this is a `Decimal`.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the flag, if this is a `Boolean`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is a `Timestamp`.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Returns the nested object, if this is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the sequence items, if this is a `List`.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<TypedObject> for Value {
    fn from(value: TypedObject) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset => serializer.serialize_none(),
            Self::Text(s) | Self::Enum(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Decimal(d) => Serialize::serialize(d, serializer),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            Self::Object(object) => object.serialize(serializer),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        assert!(Value::default().is_unset());
        assert!(!Value::default().is_present());
    }

    #[test]
    fn empty_list_is_not_present() {
        assert!(!Value::List(vec![]).is_present());
        assert!(Value::List(vec![Value::Enum("X".into())]).is_present());
    }

    #[test]
    fn option_none_is_unset() {
        let none: Option<&str> = None;
        assert!(Value::from(none).is_unset());
        assert_eq!(Value::from(Some("SC")), Value::Text("SC".into()));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(3).as_integer(), Some(3));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::Enum("LB".into()).as_str(), Some("LB"));
        assert_eq!(Value::from(Decimal::ONE).as_decimal(), Some(Decimal::ONE));
        assert!(Value::from("x").as_object().is_none());
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Unset.kind_name(), "unset");
        assert_eq!(Value::Enum("BOX".into()).kind_name(), "constant BOX");
        assert_eq!(Value::from(1).kind_name(), "integer");
    }

    #[test]
    fn serializes_scalars() {
        assert_eq!(serde_json::to_value(Value::from("SC")).unwrap(), "SC");
        assert_eq!(serde_json::to_value(Value::from(2)).unwrap(), 2);
        assert_eq!(
            serde_json::to_value(Value::from(Decimal::new(15, 1))).unwrap(),
            "1.5"
        );
        assert_eq!(
            serde_json::to_value(Value::List(vec![Value::Enum("SATURDAY_DELIVERY".into())]))
                .unwrap(),
            serde_json::json!(["SATURDAY_DELIVERY"])
        );
    }

    #[test]
    fn serializes_timestamp_as_rfc3339() {
        let ts = Timestamp::from_secs(1704067200).unwrap();
        assert_eq!(
            serde_json::to_value(Value::from(ts)).unwrap(),
            "2024-01-01T00:00:00+00:00"
        );
    }
}
