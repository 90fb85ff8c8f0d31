//! Runtime values.
//!
//! Every attribute slot on an [`Entity`] holds a [`Value`]. Plain data (what
//! comes in at the construction boundary and goes out of `serialize()`) uses
//! the scalar, `List` and `Map` variants; typed trees add `Entity` for nested
//! namespaces and `Object` for value objects such as money or addresses.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::compare;
use crate::entity::Entity;
use crate::object::ValueObject;

/// Returned for unset slots.
pub(crate) static NULL: Value = Value::Null;

/// A dynamically typed attribute value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Time(DateTime<Utc>),
    Uuid(Uuid),
    List(Vec<Value>),
    Map(ValueMap),

    /// A nested entity, exclusively owned by the slot holding it.
    Entity(Box<Entity>),

    /// An immutable value object. Cloning shares it.
    Object(Arc<dyn ValueObject>),
}

impl Value {
    /// Name of the runtime type, as used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::Time(_) => "Timestamp",
            Value::Uuid(_) => "Uuid",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Entity(entity) => entity.type_name(),
            Value::Object(object) => object.type_name(),
        }
    }

    pub fn object(object: impl ValueObject) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn ValueObject> {
        match self {
            Value::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    /// Borrow the value object as its concrete type.
    pub fn downcast_object<T: ValueObject>(&self) -> Option<&T> {
        self.as_object()?.as_any().downcast_ref::<T>()
    }
}

/// Structural equality. Comparisons that fail (an unconfigured schema, a
/// value object without comparison attributes) count as unequal; use
/// [`compare::values_equal`] to see the error.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        compare::values_equal(self, other).unwrap_or(false)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}

impl From<Entity> for Value {
    fn from(v: Entity) -> Self {
        Value::Entity(Box::new(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// JSON numbers that fit an `i64` become `Int`; every other number, including
/// unsigned integers above `i64::MAX`, becomes `Float` and may lose precision.
/// An integer coercion rejects such a float rather than truncating it.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(ValueMap::from(map)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Time(v) => v.serialize(serializer),
            Value::Uuid(v) => v.serialize(serializer),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => map.serialize(serializer),
            Value::Entity(entity) => entity
                .serialize()
                .map_err(S::Error::custom)?
                .serialize(serializer),
            Value::Object(object) => match object.to_map() {
                Some(map) => map.serialize(serializer),
                None => Err(S::Error::custom(format!(
                    "{} has no mapping form",
                    object.type_name()
                ))),
            },
        }
    }
}

/// An insertion-ordered mapping from attribute names to values.
///
/// Iteration follows insertion order. Equality ignores order, the way two
/// mappings with the same entries are equal.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(String, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing (in place) any existing value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| value == theirs))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for ValueMap {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect()
    }
}

impl Serialize for ValueMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Money;
    use serde_json::json;

    #[test]
    fn type_names_for_scalars() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::Bool(true).type_name(), "Boolean");
        assert_eq!(Value::Int(42).type_name(), "Integer");
        assert_eq!(Value::Float(1.5).type_name(), "Float");
        assert_eq!(Value::from("x").type_name(), "String");
        assert_eq!(Value::List(vec![]).type_name(), "List");
        assert_eq!(Value::Map(ValueMap::new()).type_name(), "Map");
    }

    #[test]
    fn type_name_for_value_object() {
        let money = Value::object(Money::new("USD", 42));
        assert_eq!(money.type_name(), "Money");
    }

    #[test]
    fn json_numbers_become_int_or_float() {
        assert_eq!(Value::from(json!(42)).as_int(), Some(42));
        assert_eq!(Value::from(json!(1.25)).as_float(), Some(1.25));
    }

    #[test]
    fn json_objects_keep_key_order() {
        let value = Value::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        assert_eq!(
            value.as_map().unwrap().keys().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn json_integers_beyond_i64_become_float() {
        let value = Value::from(json!(u64::MAX));
        assert_eq!(value.as_int(), None);
        assert_eq!(value.as_float(), Some(u64::MAX as f64));
    }

    #[test]
    fn json_objects_become_maps() {
        let value = Value::from(json!({"a": 1, "b": {"c": [true, null]}}));
        let map = value.as_map().unwrap();
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        let nested = map.get("b").and_then(Value::as_map).unwrap();
        assert_eq!(
            nested.get("c"),
            Some(&Value::List(vec![Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = ValueMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        let previous = map.insert("a", 3);

        assert_eq!(previous, Some(Value::Int(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn map_equality_ignores_order() {
        let left: ValueMap = [("a", 1), ("b", 2)].into_iter().collect();
        let right: ValueMap = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(left, right);

        let different: ValueMap = [("a", 1), ("b", 3)].into_iter().collect();
        assert_ne!(left, different);
    }

    #[test]
    fn remove_drops_entry() {
        let mut map: ValueMap = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(map.remove("a"), Some(Value::Int(1)));
        assert!(!map.contains_key("a"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove("missing"), None);
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert_ne!(Value::Int(42), Value::Float(42.0));
    }

    #[test]
    fn serializes_to_json_in_insertion_order() {
        let mut map = ValueMap::new();
        map.insert("z", 1);
        map.insert("a", Value::List(vec![Value::from("x"), Value::Null]));
        let rendered = serde_json::to_string(&Value::Map(map)).unwrap();
        assert_eq!(rendered, r#"{"z":1,"a":["x",null]}"#);
    }

    #[test]
    fn serializes_value_object_through_its_map() {
        let money = Value::object(Money::new("EUR", 7));
        let rendered = serde_json::to_value(&money).unwrap();
        assert_eq!(rendered, json!({"currency": "EUR", "amount": 7}));
    }

    #[test]
    fn downcast_object_recovers_concrete_type() {
        let money = Value::object(Money::new("USD", 42));
        assert_eq!(money.downcast_object::<Money>().unwrap().amount, 42);
        assert!(Value::Int(1).downcast_object::<Money>().is_none());
    }

    #[test]
    fn option_none_is_null() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some(5)), Value::Int(5));
    }
}
