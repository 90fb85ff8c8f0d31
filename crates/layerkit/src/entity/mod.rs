//! # Entities
//!
//! An [`Entity`] is an instance of a [`Schema`]: one slot per declared
//! attribute, filled through the coercing setters.
//!
//! ## Lifecycle
//!
//! There is none beyond "constructed". Attributes missing from the
//! constructing mapping leave their slot unset:
//!
//! - [`Entity::get`] reads an unset slot as `Null`
//! - [`Entity::serialize`] omits it
//! - [`Entity::equals`] compares it as `Null`
//!
//! Entities stay mutable after construction through [`Entity::set`] and
//! [`Entity::assign`].
//!
//! ## Ownership
//!
//! Nested namespace entities are owned by the slot that holds them. An entity
//! tree has no sharing and no cycles, so `Clone` is a deep copy (value
//! objects, being immutable, are shared).

mod schema;

pub use schema::{Schema, SchemaBuilder};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::compare::{self, Comparison, Differences};
use crate::config::UnknownKeys;
use crate::error::{Error, Result};
use crate::serialize;
use crate::value::{Value, ValueMap, NULL};

#[derive(Clone)]
pub struct Entity {
    schema: Arc<Schema>,
    slots: HashMap<String, Value>,
}

impl Entity {
    /// Construct from a mapping, applying each key's setter in input order.
    pub fn new(schema: &Arc<Schema>, input: ValueMap) -> Result<Self> {
        let mut entity = Self::empty(schema);
        entity.assign(input)?;
        Ok(entity)
    }

    /// An instance with every slot unset.
    pub fn empty(schema: &Arc<Schema>) -> Self {
        Self {
            schema: Arc::clone(schema),
            slots: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    pub fn is_same_type(&self, other: &Entity) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema)
    }

    /// Assign every key of `input` through its setter.
    ///
    /// Undeclared keys fail with [`Error::UnknownAttribute`], or are skipped
    /// when the schema's config ignores unknown keys.
    ///
    /// All or nothing: every key is coerced before any slot is written, so a
    /// failure leaves the entity untouched.
    pub fn assign(&mut self, input: ValueMap) -> Result<()> {
        let mut staged = Vec::with_capacity(input.len());
        for (name, value) in input {
            let Some(spec) = self.schema.attribute(&name) else {
                if self.schema.config().unknown_keys() == UnknownKeys::Ignore {
                    tracing::warn!(schema = %self.schema.name(), attribute = %name, "ignoring unknown attribute");
                    continue;
                }
                return Err(self.unknown_attribute(&name));
            };
            staged.push((spec.name.clone(), spec.write(value)?));
        }
        self.slots.extend(staged);
        Ok(())
    }

    /// The coercing writer for `name`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let spec = schema
            .attribute(name)
            .ok_or_else(|| self.unknown_attribute(name))?;
        let value = spec.write(value.into())?;
        self.slots.insert(spec.name.clone(), value);
        Ok(())
    }

    /// The reader for `name`. Unset slots read as `Null`.
    pub fn get(&self, name: &str) -> Result<&Value> {
        if self.schema.attribute(name).is_none() {
            return Err(self.unknown_attribute(name));
        }
        Ok(self.read(name))
    }

    /// Mutable access to an assigned slot, bypassing coercion.
    ///
    /// Returns `None` for an unset slot.
    pub fn get_mut(&mut self, name: &str) -> Result<Option<&mut Value>> {
        if self.schema.attribute(name).is_none() {
            return Err(self.unknown_attribute(name));
        }
        Ok(self.slots.get_mut(name))
    }

    /// Whether the slot was ever assigned (an explicit `Null` counts).
    pub fn is_set(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub(crate) fn read(&self, name: &str) -> &Value {
        self.slots.get(name).unwrap_or(&NULL)
    }

    pub(crate) fn slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn equals(&self, other: &Entity) -> Result<bool> {
        compare::entities_equal(self, other)
    }

    pub fn detailed_comparison(&self, other: &Entity) -> Result<Comparison> {
        compare::detailed_comparison(self, other)
    }

    pub fn detailed_differences(&self, other: &Entity) -> Result<Differences> {
        compare::detailed_differences(self, other)
    }

    /// Plain mapping of the serializable, assigned attributes.
    pub fn serialize(&self) -> Result<ValueMap> {
        serialize::serialize_entity(self)
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(Value::Map(self.serialize()?))?)
    }

    fn unknown_attribute(&self, name: &str) -> Error {
        Error::UnknownAttribute {
            type_name: self.schema.name().to_string(),
            name: name.to_string(),
        }
    }
}

/// See [`Entity::equals`]; a failed comparison counts as unequal.
impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other).unwrap_or(false)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.type_name());
        for name in self.schema.registry().names() {
            if let Some(value) = self.slots.get(name) {
                out.field(name, value);
            }
        }
        out.finish()
    }
}
