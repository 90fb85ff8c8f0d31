#![allow(dead_code)]

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use layerkit::object::map_from_attributes;
use layerkit::{AttributeSpec, Coercion, Error, Result, Schema, Value, ValueMap, ValueObject};

#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub currency: String,
    pub amount: i64,
}

impl Money {
    pub fn from_map(map: &ValueMap) -> Result<Self> {
        let currency = map.get("currency").and_then(Value::as_str);
        let amount = map.get("amount").and_then(Value::as_int);
        match (currency, amount) {
            (Some(currency), Some(amount)) => Ok(Money {
                currency: currency.to_string(),
                amount,
            }),
            _ => Err(Error::Coercion {
                target: "Money".into(),
                method: "from_map".into(),
                found: "Map".into(),
                reason: "expected currency and amount".into(),
            }),
        }
    }
}

impl ValueObject for Money {
    fn type_name(&self) -> &'static str {
        "Money"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn comparison_attributes(&self) -> Result<Vec<(&'static str, Value)>> {
        Ok(vec![
            ("currency", Value::from(self.currency.clone())),
            ("amount", Value::Int(self.amount)),
        ])
    }

    fn to_map(&self) -> Option<ValueMap> {
        map_from_attributes(self).ok()
    }
}

pub fn foo_schema() -> Arc<Schema> {
    Schema::builder("Foo")
        .namespace("from", |ns| {
            ns.attribute(
                AttributeSpec::new("charge")
                    .coerce(Coercion::object("Money", "from_map", Money::from_map)),
            )
        })
        .attribute(AttributeSpec::new("created_at").coerce(Coercion::timestamp()))
        .build()
}

pub fn t() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 14, 9, 30, 0).unwrap()
}

pub fn foo_input(amount: i64) -> ValueMap {
    let mut charge = ValueMap::new();
    charge.insert("currency", "USD");
    charge.insert("amount", amount);
    let mut from = ValueMap::new();
    from.insert("charge", charge);
    let mut input = ValueMap::new();
    input.insert("from", from);
    input.insert("created_at", t());
    input
}
