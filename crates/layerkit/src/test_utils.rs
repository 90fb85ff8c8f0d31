use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::attributes::{AttributeSpec, Coercion};
use crate::entity::Schema;
use crate::error::{Error, Result};
use crate::object::{map_from_attributes, ValueObject};
use crate::value::{Value, ValueMap};

/// A currency amount, the usual value object in fixtures.
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub currency: String,
    pub amount: i64,
}

impl Money {
    pub fn new(currency: &str, amount: i64) -> Self {
        Self {
            currency: currency.to_string(),
            amount,
        }
    }

    pub fn from_map(map: &ValueMap) -> Result<Self> {
        let currency = map
            .get("currency")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("currency"))?;
        let amount = map
            .get("amount")
            .and_then(Value::as_int)
            .ok_or_else(|| missing("amount"))?;
        Ok(Self::new(currency, amount))
    }
}

fn missing(field: &str) -> Error {
    Error::Coercion {
        target: "Money".to_string(),
        method: "from_map".to_string(),
        found: "Map".to_string(),
        reason: format!("missing {}", field),
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
            ("currency", Value::from(self.currency.as_str())),
            ("amount", Value::Int(self.amount)),
        ])
    }

    fn to_map(&self) -> Option<ValueMap> {
        map_from_attributes(self).ok()
    }
}

pub fn money_coercion() -> Coercion {
    Coercion::object("Money", "from_map", Money::from_map)
}

/// `Foo` with a `from` namespace holding a `charge`, plus `created_at`.
pub fn foo_schema() -> Arc<Schema> {
    Schema::builder("Foo")
        .namespace("from", |ns| {
            ns.attribute(AttributeSpec::new("charge").coerce(money_coercion()))
        })
        .attribute(AttributeSpec::new("created_at").coerce(Coercion::timestamp()))
        .build()
}

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn foo_input(amount: i64) -> ValueMap {
    let mut input = ValueMap::new();
    input.insert(
        "from",
        Value::from(json!({"charge": {"currency": "USD", "amount": amount}})),
    );
    input.insert("created_at", created_at());
    input
}
