//! Coercions and the coercing writer.
//!
//! A [`Coercion`] is a pure function from raw input to a typed value,
//! identified by its target type and method name for error messages.
//! Coercions are cheap to clone and shared by every spec that uses them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entity::Schema;
use crate::error::{Error, Result};
use crate::object::ValueObject;
use crate::value::{Value, ValueMap};

type CoerceFn = dyn Fn(Value) -> Result<Value> + Send + Sync;

#[derive(Clone)]
pub struct Coercion {
    target: String,
    method: String,
    func: Arc<CoerceFn>,
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coercion({}::{})", self.target, self.method)
    }
}

impl Coercion {
    pub fn new(
        target: impl Into<String>,
        method: impl Into<String>,
        func: impl Fn(Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            func: Arc::new(func),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn apply(&self, input: Value) -> Result<Value> {
        (self.func)(input)
    }

    /// Integers from integers, whole floats and numeric strings.
    pub fn integer() -> Self {
        Self::new("Integer", "parse", |input| match input {
            Value::Null | Value::Int(_) => Ok(input),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Ok(Value::Int(f as i64))
            }
            Value::Str(ref s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| failure("Integer", "parse", &input, e.to_string())),
            other => Err(failure("Integer", "parse", &other, "not a number")),
        })
    }

    pub fn float() -> Self {
        Self::new("Float", "parse", |input| match input {
            Value::Null | Value::Float(_) => Ok(input),
            Value::Int(i) => Ok(Value::Float(i as f64)),
            Value::Str(ref s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| failure("Float", "parse", &input, e.to_string())),
            other => Err(failure("Float", "parse", &other, "not a number")),
        })
    }

    /// Strings from any scalar.
    pub fn string() -> Self {
        Self::new("String", "to_string", |input| match input {
            Value::Null | Value::Str(_) => Ok(input),
            Value::Bool(b) => Ok(Value::Str(b.to_string())),
            Value::Int(i) => Ok(Value::Str(i.to_string())),
            Value::Float(f) => Ok(Value::Str(f.to_string())),
            Value::Uuid(id) => Ok(Value::Str(id.to_string())),
            Value::Time(t) => Ok(Value::Str(t.to_rfc3339())),
            other => Err(failure("String", "to_string", &other, "not a scalar")),
        })
    }

    pub fn boolean() -> Self {
        Self::new("Boolean", "parse", |input| match input {
            Value::Null | Value::Bool(_) => Ok(input),
            Value::Str(ref s) => match s.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(failure("Boolean", "parse", &input, "expected true or false")),
            },
            other => Err(failure("Boolean", "parse", &other, "not a boolean")),
        })
    }

    /// UTC timestamps from RFC 3339 strings or Unix seconds.
    pub fn timestamp() -> Self {
        Self::new("Timestamp", "parse", |input| match input {
            Value::Null | Value::Time(_) => Ok(input),
            Value::Str(ref s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| Value::Time(t.with_timezone(&Utc)))
                .map_err(|e| failure("Timestamp", "parse", &input, e.to_string())),
            Value::Int(secs) => DateTime::<Utc>::from_timestamp(secs, 0)
                .map(Value::Time)
                .ok_or_else(|| failure("Timestamp", "parse", &input, "out of range")),
            other => Err(failure("Timestamp", "parse", &other, "not a timestamp")),
        })
    }

    pub fn uuid() -> Self {
        Self::new("Uuid", "parse", |input| match input {
            Value::Null | Value::Uuid(_) => Ok(input),
            Value::Str(ref s) => Uuid::parse_str(s.trim())
                .map(Value::Uuid)
                .map_err(|e| failure("Uuid", "parse", &input, e.to_string())),
            other => Err(failure("Uuid", "parse", &other, "not a uuid")),
        })
    }

    /// Construct-or-passthrough for an entity schema: see [`Schema::wrap`].
    pub fn wrap(schema: &Arc<Schema>) -> Self {
        let schema = Arc::clone(schema);
        Self::new(schema.name().to_string(), "wrap", move |input| {
            schema.wrap(input).map(Value::from)
        })
    }

    /// Construct-or-passthrough for a value object.
    ///
    /// An instance of `T` is kept, a mapping is handed to `ctor`, `Null`
    /// passes through, anything else is unwrappable.
    pub fn object<T, F>(target: &'static str, method: &'static str, ctor: F) -> Self
    where
        T: ValueObject,
        F: Fn(&ValueMap) -> Result<T> + Send + Sync + 'static,
    {
        Self::new(target, method, move |input| match input {
            Value::Null => Ok(input),
            Value::Object(ref object) if object.as_any().is::<T>() => Ok(input),
            Value::Map(ref map) => ctor(map).map(Value::object),
            other => Err(Error::Unwrappable {
                target: target.to_string(),
                found: other.type_name().to_string(),
            }),
        })
    }
}

fn failure(target: &str, method: &str, found: &Value, reason: impl Into<String>) -> Error {
    Error::Coercion {
        target: target.to_string(),
        method: method.to_string(),
        found: found.type_name().to_string(),
        reason: reason.into(),
    }
}

/// Apply an attribute's coercion to an assigned value.
///
/// Array attributes coerce each element of a list input and keep the order.
/// `Null` is handed to the coercion as-is, array or not; whether it survives
/// is up to the coercion.
pub fn coerce_input(coercion: Option<&Coercion>, is_array: bool, input: Value) -> Result<Value> {
    if is_array {
        match input {
            Value::Null => {}
            Value::List(items) => {
                return items
                    .into_iter()
                    .map(|item| apply(coercion, item))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List);
            }
            other => {
                return Err(failure(
                    coercion.map_or("List", Coercion::target),
                    coercion.map_or("each", Coercion::method),
                    &other,
                    "array attribute expects a list",
                ))
            }
        }
    }
    apply(coercion, input)
}

fn apply(coercion: Option<&Coercion>, input: Value) -> Result<Value> {
    match coercion {
        Some(coercion) => coercion.apply(input),
        None => Ok(input),
    }
}
