//! Runtime values
//!
//! This module defines the value model: scalar-or-structured values, the
//! fixed-shape compound value bound to a resolved complex type, and the
//! argument carrier for simple-type construction.
//!
//! Compound values are slot-indexed records; field names resolve to slot
//! indices through a per-type [`FieldTable`] built once during resolution,
//! so name lookup only happens at the marshaling boundary.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::scalars::ScalarValue;
use crate::types::{TypeGraph, TypeId};

/// A marshaled value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (the nil object)
    Nil,
    /// A single scalar
    Scalar(ScalarValue),
    /// An ordered sequence of values (list types, repeated elements)
    List(Vec<Value>),
    /// A structured record bound to a complex type
    Compound(CompoundValue),
}

impl Value {
    /// Check if this is the nil value
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Get the scalar, if this is a scalar value
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Get the compound value, if this is one
    pub fn as_compound(&self) -> Option<&CompoundValue> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }
}

impl From<ScalarValue> for Value {
    fn from(value: ScalarValue) -> Self {
        Value::Scalar(value)
    }
}

/// Ordered field table of a resolved complex type
///
/// Field order is the type's declared order: flattened element names
/// followed by attribute names. One table exists per type instance,
/// shared by every compound value bound to it.
#[derive(Debug, Default, PartialEq)]
pub struct FieldTable {
    type_name: String,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FieldTable {
    /// Build a field table for a type
    pub fn new(type_name: impl Into<String>, names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self {
            type_name: type_name.into(),
            names,
            index,
        }
    }

    /// Name of the owning type (for error messages)
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table has no fields
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Slot index of a field name
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Field names in declared order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }
}

/// A record value bound to exactly one resolved complex type
///
/// The field set exactly matches the bound type's flattened elements and
/// attributes; unsupplied fields hold [`Value::Nil`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundValue {
    type_id: TypeId,
    fields: Arc<FieldTable>,
    slots: Vec<Value>,
}

impl CompoundValue {
    /// Create a compound value from named fields
    ///
    /// The type must be resolved. A field name the type does not declare
    /// fails with [`Error::UnknownField`].
    pub fn new(
        graph: &TypeGraph,
        type_id: TypeId,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Self> {
        let table = graph.effective_of(type_id)?.fields.clone();
        let mut slots = vec![Value::Nil; table.len()];

        for (name, value) in fields {
            let slot = table.slot(&name).ok_or_else(|| Error::UnknownField {
                type_name: table.type_name().to_string(),
                field: name.clone(),
            })?;
            slots[slot] = value;
        }

        Ok(Self {
            type_id,
            fields: table,
            slots,
        })
    }

    /// The bound type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.slot(name).map(|i| &self.slots[i])
    }

    /// Set a field value by name
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let slot = self.fields.slot(name).ok_or_else(|| Error::UnknownField {
            type_name: self.fields.type_name().to_string(),
            field: name.to_string(),
        })?;
        self.slots[slot] = value;
        Ok(())
    }

    /// Field names in the type's declared order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.names()
    }

    /// Fields in declared order, paired with their values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.names().zip(self.slots.iter())
    }
}

/// Arguments for simple-type construction
///
/// Carries positional values and keyword pairs so arity violations can be
/// reported with the same diagnostics the wire-protocol layer expects.
#[derive(Debug, Default)]
pub struct CallArgs {
    /// Positional arguments
    pub positional: Vec<ScalarValue>,
    /// Keyword arguments, in call order
    pub keyword: Vec<(String, ScalarValue)>,
}

impl CallArgs {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a positional argument
    pub fn positional(mut self, value: ScalarValue) -> Self {
        self.positional.push(value);
        self
    }

    /// Add a keyword argument
    pub fn keyword(mut self, name: impl Into<String>, value: ScalarValue) -> Self {
        self.keyword.push((name.into(), value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_table_slots() {
        let table = FieldTable::new(
            "Person",
            vec!["name".to_string(), "age".to_string(), "id".to_string()],
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.slot("name"), Some(0));
        assert_eq!(table.slot("id"), Some(2));
        assert_eq!(table.slot("missing"), None);

        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, ["name", "age", "id"]);
    }

    #[test]
    fn test_value_accessors() {
        let v = Value::Scalar(ScalarValue::Integer(1));
        assert!(!v.is_nil());
        assert_eq!(v.as_scalar(), Some(&ScalarValue::Integer(1)));
        assert!(v.as_compound().is_none());
        assert!(Value::Nil.is_nil());
    }

    #[test]
    fn test_call_args_builder() {
        let args = CallArgs::new()
            .positional(ScalarValue::Integer(1))
            .keyword("value", ScalarValue::Integer(2));
        assert_eq!(args.positional.len(), 1);
        assert_eq!(args.keyword.len(), 1);
    }
}
