//! Value objects.
//!
//! A value object is an immutable typed value stored in an attribute slot
//! (money, an address, a date range). It opts into the comparison and
//! serialization machinery by implementing the matching capability:
//!
//! - [`ValueObject::comparison_attributes`] makes it structurally comparable
//!   and lets the debug diff descend into it.
//! - [`ValueObject::to_map`] gives it a plain mapping form for `serialize()`.

use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};
use crate::value::{Value, ValueMap};

pub trait ValueObject: fmt::Debug + Send + Sync + 'static {
    /// Runtime type name, used in error messages and `Value::type_name`.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Named values that define equality, in comparison order.
    ///
    /// Types that want structural comparison must override this; the
    /// default fails with [`Error::AbstractMethod`].
    fn comparison_attributes(&self) -> Result<Vec<(&'static str, Value)>> {
        Err(Error::AbstractMethod {
            type_name: self.type_name().to_string(),
            method: "comparison_attributes",
        })
    }

    /// Plain mapping form. `None` means the object is passed through
    /// serialization unchanged.
    fn to_map(&self) -> Option<ValueMap> {
        None
    }
}

/// Derive a mapping from the comparison attributes.
///
/// Handy for `to_map` implementations when the compared fields are also the
/// serialized ones.
pub fn map_from_attributes(object: &dyn ValueObject) -> Result<ValueMap> {
    Ok(object.comparison_attributes()?.into_iter().collect())
}
