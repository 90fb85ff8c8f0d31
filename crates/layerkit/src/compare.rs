//! # Structural Comparison
//!
//! Equality folds over each type's comparable attributes and delegates to the
//! values held there. A value that exposes named fields of its own (a nested
//! [`Entity`], or a [`ValueObject`] with comparison attributes) is compared
//! field by field; anything else is compared as a primitive.
//!
//! Two debug views share the same recursion:
//!
//! - [`detailed_comparison`] returns the full tree, equal fields included.
//! - [`detailed_differences`] keeps only mismatching leaves, dropping every
//!   subtree that is equal at all depths.
//!
//! ```text
//! Foo { from: { charge: Money(USD, 42) } }      Foo { from: { charge: Money(USD, 43) } }
//!
//! detailed_differences  =>  { from: { charge: { amount: [42, 43] } } }
//! ```

use crate::entity::Entity;
use crate::error::Result;
use crate::object::ValueObject;
use crate::value::{Value, ValueMap, NULL};

/// Structural equality between two values.
pub fn values_equal(left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        (Value::Entity(l), Value::Entity(r)) => entities_equal(l, r),
        (Value::Object(l), Value::Object(r)) => objects_equal(l.as_ref(), r.as_ref()),
        (Value::List(l), Value::List(r)) => lists_equal(l, r),
        (Value::Map(l), Value::Map(r)) => maps_equal(l, r),
        (Value::Null, Value::Null) => Ok(true),
        (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
        (Value::Int(l), Value::Int(r)) => Ok(l == r),
        // NaN equals NaN so that every value is equal to itself
        (Value::Float(l), Value::Float(r)) => Ok(l == r || (l.is_nan() && r.is_nan())),
        (Value::Str(l), Value::Str(r)) => Ok(l == r),
        (Value::Time(l), Value::Time(r)) => Ok(l == r),
        (Value::Uuid(l), Value::Uuid(r)) => Ok(l == r),
        _ => Ok(false),
    }
}

/// Entity equality: same type, and every comparable attribute equal.
///
/// An unset slot reads as `Null`. A type whose attributes all opt out of
/// comparison is vacuously equal to any other instance of the same type.
pub fn entities_equal(left: &Entity, right: &Entity) -> Result<bool> {
    if !left.is_same_type(right) {
        return Ok(false);
    }
    for name in left.schema().registry().comparable_names()? {
        if !values_equal(left.read(name), right.read(name))? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn objects_equal(left: &dyn ValueObject, right: &dyn ValueObject) -> Result<bool> {
    if left.as_any().type_id() != right.as_any().type_id() {
        return Ok(false);
    }
    let left_fields = left.comparison_attributes()?;
    let right_fields = right.comparison_attributes()?;
    if left_fields.len() != right_fields.len() {
        return Ok(false);
    }
    for ((left_name, l), (right_name, r)) in left_fields.iter().zip(&right_fields) {
        if left_name != right_name || !values_equal(l, r)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn lists_equal(left: &[Value], right: &[Value]) -> Result<bool> {
    if left.len() != right.len() {
        return Ok(false);
    }
    for (l, r) in left.iter().zip(right) {
        if !values_equal(l, r)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn maps_equal(left: &ValueMap, right: &ValueMap) -> Result<bool> {
    if left.len() != right.len() {
        return Ok(false);
    }
    for (key, l) in left.iter() {
        match right.get(key) {
            Some(r) if values_equal(l, r)? => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

/// Something that exposes named fields for comparison.
enum Structure<'a> {
    Entity(&'a Entity),
    Object(&'a dyn ValueObject),
}

impl<'a> Structure<'a> {
    fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Entity(entity) => Some(Structure::Entity(entity)),
            Value::Object(object) => Some(Structure::Object(object.as_ref())),
            _ => None,
        }
    }

    fn same_type(&self, other: &Structure<'_>) -> bool {
        match (self, other) {
            (Structure::Entity(l), Structure::Entity(r)) => l.is_same_type(r),
            (Structure::Object(l), Structure::Object(r)) => {
                l.as_any().type_id() == r.as_any().type_id()
            }
            _ => false,
        }
    }

    fn fields(&self) -> Result<Vec<(String, Value)>> {
        match self {
            Structure::Entity(entity) => Ok(entity
                .schema()
                .registry()
                .comparable_names()?
                .into_iter()
                .map(|name| (name.to_string(), entity.read(name).clone()))
                .collect()),
            Structure::Object(object) => Ok(object
                .comparison_attributes()?
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect()),
        }
    }
}

fn field_named<'v>(fields: &'v [(String, Value)], name: &str) -> &'v Value {
    fields
        .iter()
        .find(|(field, _)| field == name)
        .map_or(&NULL, |(_, value)| value)
}

/// Full comparison tree for two entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub equal: bool,
    pub fields: Vec<(String, FieldComparison)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldComparison {
    /// Both sides expose fields of the same type; compared recursively.
    Nested(Comparison),
    Leaf {
        equal: bool,
        left: Value,
        right: Value,
    },
}

impl Comparison {
    pub fn field(&self, name: &str) -> Option<&FieldComparison> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, comparison)| comparison)
    }

    /// Render as `{equal, fields: {name: ...}}`, leaves as `{equal, pair: [left, right]}`.
    pub fn to_value(&self) -> Value {
        let fields: ValueMap = self
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.to_value()))
            .collect();
        let mut out = ValueMap::new();
        out.insert("equal", self.equal);
        out.insert("fields", fields);
        Value::Map(out)
    }
}

impl FieldComparison {
    pub fn is_equal(&self) -> bool {
        match self {
            FieldComparison::Nested(comparison) => comparison.equal,
            FieldComparison::Leaf { equal, .. } => *equal,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            FieldComparison::Nested(comparison) => comparison.to_value(),
            FieldComparison::Leaf { equal, left, right } => {
                let mut out = ValueMap::new();
                out.insert("equal", *equal);
                out.insert("pair", Value::List(vec![left.clone(), right.clone()]));
                Value::Map(out)
            }
        }
    }
}

pub fn detailed_comparison(left: &Entity, right: &Entity) -> Result<Comparison> {
    let (left, right) = (Structure::Entity(left), Structure::Entity(right));
    if !left.same_type(&right) {
        return Ok(Comparison {
            equal: false,
            fields: Vec::new(),
        });
    }
    compare_structures(&left, &right)
}

fn compare_structures(left: &Structure<'_>, right: &Structure<'_>) -> Result<Comparison> {
    let right_fields = right.fields()?;
    let mut equal = true;
    let mut fields = Vec::new();
    for (name, l) in left.fields()? {
        let field = compare_field(&l, field_named(&right_fields, &name))?;
        equal &= field.is_equal();
        fields.push((name, field));
    }
    Ok(Comparison { equal, fields })
}

fn compare_field(left: &Value, right: &Value) -> Result<FieldComparison> {
    match (Structure::of(left), Structure::of(right)) {
        (Some(l), Some(r)) if l.same_type(&r) => {
            compare_structures(&l, &r).map(FieldComparison::Nested)
        }
        _ => Ok(FieldComparison::Leaf {
            equal: values_equal(left, right)?,
            left: left.clone(),
            right: right.clone(),
        }),
    }
}

/// Mismatching leaves only, keyed by field name at every level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Differences {
    entries: Vec<(String, Difference)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    Nested(Differences),
    Changed { left: Value, right: Value },
}

impl Differences {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&Difference> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, difference)| difference)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Difference)> {
        self.entries.iter().map(|(name, d)| (name.as_str(), d))
    }

    /// Dotted paths of every changed leaf, depth first.
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, difference) in &self.entries {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            match difference {
                Difference::Nested(nested) => nested.collect_paths(&path, out),
                Difference::Changed { .. } => out.push(path),
            }
        }
    }

    /// Render as nested mappings with `[left, right]` pairs at the leaves.
    pub fn to_value(&self) -> Value {
        let map: ValueMap = self
            .entries
            .iter()
            .map(|(name, difference)| {
                let value = match difference {
                    Difference::Nested(nested) => nested.to_value(),
                    Difference::Changed { left, right } => {
                        Value::List(vec![left.clone(), right.clone()])
                    }
                };
                (name.as_str(), value)
            })
            .collect();
        Value::Map(map)
    }
}

pub fn detailed_differences(left: &Entity, right: &Entity) -> Result<Differences> {
    let (left, right) = (Structure::Entity(left), Structure::Entity(right));
    if !left.same_type(&right) {
        // Nothing to line up field by field.
        return Ok(Differences::default());
    }
    diff_structures(&left, &right)
}

fn diff_structures(left: &Structure<'_>, right: &Structure<'_>) -> Result<Differences> {
    let right_fields = right.fields()?;
    let mut entries = Vec::new();
    for (name, l) in left.fields()? {
        let r = field_named(&right_fields, &name);
        match (Structure::of(&l), Structure::of(r)) {
            (Some(ls), Some(rs)) if ls.same_type(&rs) => {
                let nested = diff_structures(&ls, &rs)?;
                if !nested.is_empty() {
                    entries.push((name, Difference::Nested(nested)));
                }
            }
            _ => {
                if !values_equal(&l, r)? {
                    entries.push((
                        name,
                        Difference::Changed {
                            left: l.clone(),
                            right: r.clone(),
                        },
                    ));
                }
            }
        }
    }
    Ok(Differences { entries })
}
