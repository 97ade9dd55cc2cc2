use std::collections::BTreeMap;

use crate::firestore::model::{GeoPoint, Timestamp};
use crate::firestore::value::{ArrayValue, BytesValue, MapValue};

#[derive(Clone, Debug, PartialEq)]
pub struct FirestoreValue {
    kind: ValueKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(Timestamp),
    String(String),
    Bytes(BytesValue),
    Reference(String),
    GeoPoint(GeoPoint),
    Array(ArrayValue),
    Map(MapValue),
}

/// Cross-type precedence used when ordering query results.
///
/// Integers and doubles share [`TypeOrder::Number`], so they are compared on a
/// single numeric line rather than by variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeOrder {
    Null,
    Boolean,
    Number,
    Timestamp,
    String,
    Bytes,
    Reference,
    GeoPoint,
    Array,
    Map,
}

impl ValueKind {
    pub fn type_order(&self) -> TypeOrder {
        match self {
            ValueKind::Null => TypeOrder::Null,
            ValueKind::Boolean(_) => TypeOrder::Boolean,
            ValueKind::Integer(_) | ValueKind::Double(_) => TypeOrder::Number,
            ValueKind::Timestamp(_) => TypeOrder::Timestamp,
            ValueKind::String(_) => TypeOrder::String,
            ValueKind::Bytes(_) => TypeOrder::Bytes,
            ValueKind::Reference(_) => TypeOrder::Reference,
            ValueKind::GeoPoint(_) => TypeOrder::GeoPoint,
            ValueKind::Array(_) => TypeOrder::Array,
            ValueKind::Map(_) => TypeOrder::Map,
        }
    }
}

impl FirestoreValue {
    pub fn null() -> Self {
        Self::from_kind(ValueKind::Null)
    }

    pub fn from_kind(kind: ValueKind) -> Self {
        Self { kind }
    }

    pub fn from_bool(value: bool) -> Self {
        Self::from_kind(ValueKind::Boolean(value))
    }

    pub fn from_integer(value: i64) -> Self {
        Self::from_kind(ValueKind::Integer(value))
    }

    pub fn from_double(value: f64) -> Self {
        Self::from_kind(ValueKind::Double(value))
    }

    pub fn from_timestamp(value: Timestamp) -> Self {
        Self::from_kind(ValueKind::Timestamp(value))
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Self::from_kind(ValueKind::String(value.into()))
    }

    pub fn from_bytes(value: BytesValue) -> Self {
        Self::from_kind(ValueKind::Bytes(value))
    }

    /// A reference to another document, given as its slash-separated path.
    pub fn from_reference(path: impl Into<String>) -> Self {
        Self::from_kind(ValueKind::Reference(path.into()))
    }

    pub fn from_geo_point(value: GeoPoint) -> Self {
        Self::from_kind(ValueKind::GeoPoint(value))
    }

    pub fn from_array(values: Vec<FirestoreValue>) -> Self {
        Self::from_kind(ValueKind::Array(ArrayValue::new(values)))
    }

    pub fn from_map(map: BTreeMap<String, FirestoreValue>) -> Self {
        Self::from_kind(ValueKind::Map(MapValue::new(map)))
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn type_order(&self) -> TypeOrder {
        self.kind.type_order()
    }
}

impl From<bool> for FirestoreValue {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<i64> for FirestoreValue {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<f64> for FirestoreValue {
    fn from(value: f64) -> Self {
        Self::from_double(value)
    }
}

impl From<&str> for FirestoreValue {
    fn from(value: &str) -> Self {
        Self::from_string(value)
    }
}

impl From<String> for FirestoreValue {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

impl From<Timestamp> for FirestoreValue {
    fn from(value: Timestamp) -> Self {
        Self::from_timestamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_values() {
        let v = FirestoreValue::from_string("hello");
        match v.kind() {
            ValueKind::String(value) => assert_eq!(value, "hello"),
            _ => panic!("unexpected kind"),
        }
    }

    #[test]
    fn numbers_share_a_type_order() {
        assert_eq!(
            FirestoreValue::from_integer(1).type_order(),
            FirestoreValue::from_double(1.5).type_order()
        );
        assert!(FirestoreValue::null().type_order() < FirestoreValue::from(false).type_order());
        assert!(TypeOrder::Reference < TypeOrder::GeoPoint);
        assert!(TypeOrder::Array < TypeOrder::Map);
    }
}
