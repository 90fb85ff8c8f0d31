//! Per-type attribute registry.

use super::spec::AttributeSpec;
use crate::error::{Error, Result};

/// Ordered list of the attributes declared on one entity type.
///
/// Declaration order is serialization order. Names are unique: redeclaring a
/// name replaces its spec and keeps its original position.
#[derive(Debug, Clone)]
pub struct AttributeRegistry {
    owner: String,
    specs: Vec<AttributeSpec>,
}

impl AttributeRegistry {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            specs: Vec::new(),
        }
    }

    /// Seed a registry for `owner` with independent copies of the parent's specs.
    pub fn inherit(owner: impl Into<String>, parent: &AttributeRegistry) -> Self {
        Self {
            owner: owner.into(),
            specs: parent.specs.clone(),
        }
    }

    /// Name of the type this registry describes.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Register a spec. Returns the spec it replaced, if the name was taken.
    pub fn declare(&mut self, spec: AttributeSpec) -> Option<AttributeSpec> {
        match self.specs.iter_mut().find(|existing| existing.name == spec.name) {
            Some(existing) => {
                tracing::debug!(owner = %self.owner, attribute = %spec.name, "attribute redeclared");
                Some(std::mem::replace(existing, spec))
            }
            None => {
                self.specs.push(spec);
                None
            }
        }
    }

    /// Look up a spec by name.
    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.specs.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Names used by structural equality, in declaration order.
    ///
    /// Fails with [`Error::NotConfigured`] when nothing has been declared,
    /// which is different from every attribute opting out.
    pub fn comparable_names(&self) -> Result<Vec<&str>> {
        self.ensure_configured()?;
        Ok(self
            .specs
            .iter()
            .filter(|spec| spec.comparable)
            .map(|spec| spec.name.as_str())
            .collect())
    }

    /// Names emitted by `serialize()`, in declaration order.
    pub fn serializable_names(&self) -> Result<Vec<&str>> {
        self.ensure_configured()?;
        Ok(self
            .specs
            .iter()
            .filter(|spec| spec.serializable)
            .map(|spec| spec.name.as_str())
            .collect())
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.specs.is_empty() {
            return Err(Error::NotConfigured {
                type_name: self.owner.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Coercion;

    fn invoice() -> AttributeRegistry {
        let mut registry = AttributeRegistry::new("Invoice");
        registry.declare(AttributeSpec::new("number"));
        registry.declare(AttributeSpec::new("total").coerce(Coercion::integer()));
        registry.declare(AttributeSpec::new("cached_label").comparable(false));
        registry.declare(AttributeSpec::new("checksum").serializable(false));
        registry.declare(
            AttributeSpec::new("scratch")
                .comparable(false)
                .serializable(false),
        );
        registry
    }

    #[test]
    fn registry_keeps_declaration_order() {
        let registry = invoice();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["number", "total", "cached_label", "checksum", "scratch"]
        );
    }

    #[test]
    fn comparable_and_serializable_sets_are_independent() {
        let registry = invoice();
        assert_eq!(
            registry.comparable_names().unwrap(),
            vec!["number", "total", "checksum"]
        );
        assert_eq!(
            registry.serializable_names().unwrap(),
            vec!["number", "total", "cached_label"]
        );
    }

    #[test]
    fn unknown_attribute_returns_none() {
        assert!(invoice().get("nonexistent").is_none());
    }

    #[test]
    fn empty_registry_is_not_configured() {
        let registry = AttributeRegistry::new("Blank");
        let err = registry.comparable_names().unwrap_err();
        match err {
            Error::NotConfigured { type_name } => assert_eq!(type_name, "Blank"),
            other => panic!("Expected NotConfigured, got {:?}", other),
        }
        assert!(matches!(
            registry.serializable_names(),
            Err(Error::NotConfigured { .. })
        ));
    }

    #[test]
    fn all_opted_out_is_empty_not_unconfigured() {
        let mut registry = AttributeRegistry::new("Quiet");
        registry.declare(AttributeSpec::new("x").comparable(false));
        assert!(registry.comparable_names().unwrap().is_empty());
    }

    #[test]
    fn redeclaration_replaces_without_duplicating() {
        let mut registry = invoice();
        let replaced = registry.declare(AttributeSpec::new("total").comparable(false));

        assert!(replaced.unwrap().comparable);
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.names().filter(|n| *n == "total").count(), 1);
        // keeps its original position
        assert_eq!(registry.names().nth(1), Some("total"));
        assert!(!registry.comparable_names().unwrap().contains(&"total"));
        assert_eq!(
            registry
                .serializable_names()
                .unwrap()
                .iter()
                .filter(|n| **n == "total")
                .count(),
            1
        );
    }

    #[test]
    fn inherited_registry_does_not_touch_parent() {
        let parent = invoice();
        let mut child = AttributeRegistry::inherit("CreditNote", &parent);
        child.declare(AttributeSpec::new("reason"));
        child.declare(AttributeSpec::new("number").serializable(false));

        assert_eq!(child.owner(), "CreditNote");
        assert_eq!(child.len(), 6);
        assert_eq!(parent.len(), 5);
        assert!(parent.get("reason").is_none());
        assert!(parent.get("number").unwrap().serializable);
    }
}
