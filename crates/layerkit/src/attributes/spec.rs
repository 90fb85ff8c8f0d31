//! Attribute specifications.

use super::coercion::{coerce_input, Coercion};
use crate::error::Result;
use crate::value::Value;

/// Specification for a single declared attribute.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    /// The attribute name, also the key used at the mapping boundary
    pub name: String,

    /// Applied by the writer to every assigned value; `None` stores input as-is
    pub coercion: Option<Coercion>,

    /// Whether this attribute participates in structural equality
    pub comparable: bool,

    /// Whether this attribute is emitted by `serialize()`
    pub serializable: bool,

    /// Whether the coercion applies element-wise to a list input
    pub is_array: bool,
}

impl AttributeSpec {
    /// Create a spec with the default flags: comparable, serializable, scalar.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coercion: None,
            comparable: true,
            serializable: true,
            is_array: false,
        }
    }

    /// Set the coercion applied on write.
    pub fn coerce(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Set the comparable flag.
    pub fn comparable(mut self, flag: bool) -> Self {
        self.comparable = flag;
        self
    }

    /// Set the serializable flag.
    pub fn serializable(mut self, flag: bool) -> Self {
        self.serializable = flag;
        self
    }

    /// Mark the attribute as holding a list of coerced elements.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// The coercing writer: turn raw input into the value stored in the slot.
    pub fn write(&self, input: Value) -> Result<Value> {
        tracing::trace!(attribute = %self.name, input = input.type_name(), "coercing write");
        coerce_input(self.coercion.as_ref(), self.is_array, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_spec_has_default_flags() {
        let spec = AttributeSpec::new("title");
        assert_eq!(spec.name, "title");
        assert!(spec.coercion.is_none());
        assert!(spec.comparable);
        assert!(spec.serializable);
        assert!(!spec.is_array);
    }

    #[test]
    fn flags_are_independent() {
        let spec = AttributeSpec::new("secret")
            .comparable(false)
            .serializable(true);
        assert!(!spec.comparable);
        assert!(spec.serializable);

        let spec = AttributeSpec::new("cache").serializable(false);
        assert!(spec.comparable);
        assert!(!spec.serializable);
    }

    #[test]
    fn write_without_coercion_stores_raw_input() {
        let spec = AttributeSpec::new("note");
        assert_eq!(spec.write(Value::from("raw")).unwrap(), Value::from("raw"));
    }

    #[test]
    fn write_applies_coercion() {
        let spec = AttributeSpec::new("count").coerce(Coercion::integer());
        assert_eq!(spec.write(Value::from("12")).unwrap(), Value::Int(12));
    }

    #[test]
    fn array_write_coerces_each_element() {
        let spec = AttributeSpec::new("counts")
            .coerce(Coercion::integer())
            .array();
        let written = spec
            .write(Value::List(vec![Value::from("1"), Value::Int(2)]))
            .unwrap();
        assert_eq!(written, Value::List(vec![Value::Int(1), Value::Int(2)]));
    }
}
