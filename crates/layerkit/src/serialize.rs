//! Conversion of typed entity trees back into plain mappings.

use crate::entity::Entity;
use crate::error::Result;
use crate::value::{Value, ValueMap};

/// Build the plain mapping for an entity, in declaration order.
///
/// Only serializable attributes whose slot has been assigned are emitted;
/// unset slots are skipped rather than written as `Null`.
pub fn serialize_entity(entity: &Entity) -> Result<ValueMap> {
    let names = entity.schema().registry().serializable_names()?;
    let mut out = ValueMap::new();
    for name in names {
        if let Some(value) = entity.slot(name) {
            out.insert(name, to_plain(value)?);
        }
    }
    Ok(out)
}

/// Convert one stored value to plain data.
///
/// Entities serialize recursively, value objects use their mapping form if
/// they have one, lists and mapping values are converted element by element,
/// and everything else is passed through.
pub fn to_plain(value: &Value) -> Result<Value> {
    match value {
        Value::Entity(entity) => serialize_entity(entity).map(Value::Map),
        Value::Object(object) => match object.to_map() {
            Some(map) => plain_map(&map).map(Value::Map),
            None => Ok(value.clone()),
        },
        Value::List(items) => items
            .iter()
            .map(to_plain)
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        Value::Map(map) => plain_map(map).map(Value::Map),
        other => Ok(other.clone()),
    }
}

fn plain_map(map: &ValueMap) -> Result<ValueMap> {
    let mut out = ValueMap::new();
    for (key, value) in map.iter() {
        out.insert(key, to_plain(value)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeSpec;
    use crate::entity::Schema;
    use crate::error::Error;
    use crate::object::ValueObject;
    use crate::test_utils::{created_at, foo_input, foo_schema, Money};
    use serde_json::json;
    use std::any::Any;

    #[derive(Debug)]
    struct Tag(&'static str);

    impl ValueObject for Tag {
        fn type_name(&self) -> &'static str {
            "Tag"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn serializes_nested_namespace_and_value_object() {
        let entity = foo_schema().wrap(foo_input(42)).unwrap();
        let mut expected = ValueMap::new();
        expected.insert(
            "from",
            Value::from(json!({"charge": {"currency": "USD", "amount": 42}})),
        );
        expected.insert("created_at", created_at());

        assert_eq!(entity.serialize().unwrap(), expected);
    }

    #[test]
    fn output_follows_declaration_order() {
        let entity = foo_schema().wrap(foo_input(42)).unwrap();
        let keys: Vec<String> = entity
            .serialize()
            .unwrap()
            .keys()
            .map(str::to_string)
            .collect();
        assert_eq!(keys, vec!["from", "created_at"]);
    }

    #[test]
    fn unset_slots_are_omitted() {
        let schema = Schema::builder("Pair").attr("a").attr("b").build();
        let entity = schema.wrap(json!({"a": 1})).unwrap();
        let out = entity.serialize().unwrap();
        assert!(!out.contains_key("b"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn explicit_null_is_emitted() {
        let schema = Schema::builder("Pair").attr("a").attr("b").build();
        let entity = schema.wrap(json!({"a": 1, "b": null})).unwrap();
        assert_eq!(entity.serialize().unwrap().get("b"), Some(&Value::Null));
    }

    #[test]
    fn non_serializable_attributes_are_skipped() {
        let schema = Schema::builder("Session")
            .attr("user")
            .attribute(AttributeSpec::new("token").serializable(false))
            .build();
        let entity = schema.wrap(json!({"user": "ada", "token": "s3cret"})).unwrap();
        assert_eq!(
            Value::Map(entity.serialize().unwrap()),
            Value::from(json!({"user": "ada"}))
        );
    }

    #[test]
    fn unconfigured_schema_is_an_error() {
        let schema = Schema::builder("Empty").build();
        let entity = Entity::empty(&schema);
        assert!(matches!(
            entity.serialize(),
            Err(Error::NotConfigured { .. })
        ));
    }

    #[test]
    fn lists_and_maps_are_converted_elementwise() {
        let value = Value::List(vec![
            Value::object(Money::new("USD", 1)),
            Value::Map([("m", Value::object(Money::new("EUR", 2)))].into_iter().collect()),
        ]);
        assert_eq!(
            to_plain(&value).unwrap(),
            Value::from(json!([
                {"currency": "USD", "amount": 1},
                {"m": {"currency": "EUR", "amount": 2}}
            ]))
        );
    }

    #[test]
    fn objects_without_mapping_pass_through() {
        let value = Value::object(Tag("urgent"));
        let plain = to_plain(&value).unwrap();
        let tag = plain.downcast_object::<Tag>().unwrap();
        assert_eq!(tag.0, "urgent");
    }

    #[test]
    fn serialize_is_idempotent() {
        let entity = foo_schema().wrap(foo_input(7)).unwrap();
        assert_eq!(entity.serialize().unwrap(), entity.serialize().unwrap());
    }
}
