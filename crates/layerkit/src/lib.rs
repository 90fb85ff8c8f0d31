//! # Layerkit Architecture
//!
//! Layerkit is a **declarative entity model**: describe a type once as a list
//! of attributes, and get coercing setters, structural equality with a debug
//! diff, and conversion back to plain data, for arbitrarily nested types.
//!
//! ## Data Flow
//!
//! ```text
//!   plain mapping ──── wrap / new_entity ────▶ typed entity tree
//!   (Value::Map)        (coercing setters)     (Entity, Value::Object, ...)
//!         ▲                                            │
//!         └──────────────── serialize ◀────────────────┘
//!
//!   equals / detailed_comparison / detailed_differences work on the live tree
//! ```
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Entity Model (entity/)                                     │
//! │  - Schema + SchemaBuilder: declarations, namespaces, extend │
//! │  - Entity: slots, readers, setters, wrap                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//! ┌───────────────────────────┐ ┌───────────────────────────────┐
//! │  Comparison (compare.rs)  │ │  Serialization (serialize.rs) │
//! └───────────────────────────┘ └───────────────────────────────┘
//!               │                             │
//!               └──────────────┬──────────────┘
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attributes (attributes/)                                   │
//! │  - AttributeSpec, AttributeRegistry, Coercion               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Values (value.rs, object.rs)                               │
//! │  - Value, ValueMap, the ValueObject capability trait        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let foo = Schema::builder("Foo")
//!     .namespace("from", |ns| ns.attribute(AttributeSpec::new("charge").coerce(money)))
//!     .attribute(AttributeSpec::new("created_at").coerce(Coercion::timestamp()))
//!     .build();
//!
//! let a = foo.wrap(json!({"from": {"charge": {"currency": "USD", "amount": 42}}}))?;
//! let b = foo.wrap(json!({"from": {"charge": {"currency": "USD", "amount": 43}}}))?;
//! a.detailed_differences(&b)?.to_value(); // {from: {charge: {amount: [42, 43]}}}
//! ```
//!
//! ## Errors
//!
//! Every failure is a precondition violation reported at the call site
//! (see [`error::Error`]). Nothing is retried or recovered internally.
//!
//! ## Module Overview
//!
//! - [`entity`]: Schemas, the builder, and entity instances
//! - [`attributes`]: Attribute specs, the per-type registry, coercions
//! - [`compare`]: Structural equality and the debug diff trees
//! - [`serialize`]: Typed tree to plain mapping
//! - [`value`]: The runtime value domain
//! - [`object`]: Value object capabilities
//! - [`config`]: Model policy configuration
//! - [`error`]: Error types

pub mod attributes;
pub mod compare;
pub mod config;
pub mod entity;
pub mod error;
pub mod object;
pub mod serialize;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod value;

pub use attributes::{AttributeRegistry, AttributeSpec, Coercion};
pub use compare::{Comparison, Difference, Differences, FieldComparison};
pub use config::{ModelConfig, UnknownKeys};
pub use entity::{Entity, Schema, SchemaBuilder};
pub use error::{Error, Result};
pub use object::ValueObject;
pub use value::{Value, ValueMap};
