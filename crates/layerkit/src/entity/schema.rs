//! Entity schemas and their builder.

use std::fmt;
use std::sync::Arc;

use convert_case::{Case, Casing};

use super::Entity;
use crate::attributes::{AttributeRegistry, AttributeSpec, Coercion};
use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::value::{Value, ValueMap};

/// An entity type: a name, its attribute registry and its nested namespace types.
///
/// Schemas are built once and shared behind an `Arc`. Two entities have the
/// same runtime type exactly when they point at the same schema.
pub struct Schema {
    name: String,
    registry: AttributeRegistry,
    namespaces: Vec<(String, Arc<Schema>)>,
    config: ModelConfig,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("attributes", &self.registry.names().collect::<Vec<_>>())
            .finish()
    }
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Start a child schema seeded with copies of this schema's declarations.
    ///
    /// The child is a distinct type; declaring on it never changes `self`.
    pub fn extend(&self, name: impl Into<String>) -> SchemaBuilder {
        let name = name.into();
        SchemaBuilder {
            registry: AttributeRegistry::inherit(name.clone(), &self.registry),
            namespaces: self.namespaces.clone(),
            config: self.config.clone(),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &AttributeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.registry.get(name)
    }

    /// The nested type generated for a namespace attribute.
    pub fn namespace(&self, name: &str) -> Option<&Arc<Schema>> {
        self.namespaces
            .iter()
            .find(|(namespace, _)| namespace == name)
            .map(|(_, schema)| schema)
    }

    /// Construct an entity by assigning every key of `input` through its setter.
    pub fn new_entity(self: &Arc<Self>, input: ValueMap) -> Result<Entity> {
        Entity::new(self, input)
    }

    /// Idempotent construction.
    ///
    /// An entity of this type is returned as-is (moved, not copied), a
    /// mapping is constructed into a new entity, and anything else fails
    /// with [`Error::Unwrappable`] naming the rejected type.
    pub fn wrap(self: &Arc<Self>, input: impl Into<Value>) -> Result<Entity> {
        match input.into() {
            Value::Entity(entity) if Arc::ptr_eq(entity.schema(), self) => Ok(*entity),
            Value::Map(map) => Entity::new(self, map),
            other => Err(Error::Unwrappable {
                target: self.name.clone(),
                found: other.type_name().to_string(),
            }),
        }
    }
}

/// Declares the attributes of a schema.
///
/// ```ignore
/// let foo = Schema::builder("Foo")
///     .namespace("from", |ns| ns.attribute(AttributeSpec::new("charge").coerce(money)))
///     .attribute(AttributeSpec::new("created_at").coerce(Coercion::timestamp()))
///     .build();
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    registry: AttributeRegistry,
    namespaces: Vec<(String, Arc<Schema>)>,
    config: ModelConfig,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            registry: AttributeRegistry::new(name.clone()),
            namespaces: Vec::new(),
            config: ModelConfig::default(),
            name,
        }
    }

    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare an attribute. A repeated name replaces the earlier declaration.
    pub fn attribute(mut self, spec: AttributeSpec) -> Self {
        self.namespaces.retain(|(name, _)| *name != spec.name);
        self.registry.declare(spec);
        self
    }

    /// Declare a plain attribute with default flags and no coercion.
    pub fn attr(self, name: impl Into<String>) -> Self {
        self.attribute(AttributeSpec::new(name))
    }

    /// Declare a namespace: a nested type built by `body`, stored under `name`.
    ///
    /// Assigning a mapping to the attribute constructs the nested type;
    /// assigning an instance of it keeps the instance.
    pub fn namespace(
        self,
        name: impl Into<String>,
        body: impl FnOnce(SchemaBuilder) -> SchemaBuilder,
    ) -> Self {
        self.namespace_with(AttributeSpec::new(name), body)
    }

    /// Like [`namespace`](Self::namespace), keeping the flags set on `spec`.
    ///
    /// An array spec holds a list of nested entities.
    pub fn namespace_with(
        self,
        spec: AttributeSpec,
        body: impl FnOnce(SchemaBuilder) -> SchemaBuilder,
    ) -> Self {
        let nested_name = format!("{}::{}", self.name, spec.name.to_case(Case::Pascal));
        let nested = body(SchemaBuilder::new(nested_name).config(self.config.clone())).build();
        let name = spec.name.clone();

        let mut builder = self.attribute(spec.coerce(Coercion::wrap(&nested)));
        builder.namespaces.push((name, nested));
        builder
    }

    pub fn build(self) -> Arc<Schema> {
        tracing::debug!(
            schema = %self.name,
            attributes = self.registry.len(),
            namespaces = self.namespaces.len(),
            "schema built"
        );
        Arc::new(Schema {
            name: self.name,
            registry: self.registry,
            namespaces: self.namespaces,
            config: self.config,
        })
    }
}
