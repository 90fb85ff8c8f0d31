//! # Attribute System
//!
//! Every entity type is described by a list of declared attributes. Instead of
//! hand-writing accessors, equality and serialization for each type, an
//! attribute declaration provides:
//!
//! - **Specification**: name, optional coercion, and the comparable,
//!   serializable and array flags ([`AttributeSpec`])
//! - **Registry**: the ordered, per-type list of specs ([`AttributeRegistry`])
//! - **Coercing writer**: the setter that turns raw input into a typed value
//!   ([`AttributeSpec::write`], driven by a [`Coercion`])
//!
//! ## Flags
//!
//! | Flag | Default | Effect |
//! |------|---------|--------|
//! | `comparable` | `true` | Participates in structural equality and diffs |
//! | `serializable` | `true` | Emitted by `serialize()` |
//! | `is_array` | `false` | Coercion applies to each element of a list input |
//!
//! The comparable and serializable sets are independent: an attribute can be
//! in either, both or neither.
//!
//! ## Usage
//!
//! ```ignore
//! let spec = AttributeSpec::new("amount")
//!     .coerce(Coercion::integer())
//!     .comparable(false);
//! let mut registry = AttributeRegistry::new("Invoice");
//! registry.declare(spec);
//! assert!(registry.comparable_names()?.is_empty());
//! ```

mod coercion;
mod registry;
mod spec;

pub use coercion::{coerce_input, Coercion};
pub use registry::AttributeRegistry;
pub use spec::AttributeSpec;
