//! Canonical serialized representation
//!
//! Serialization turns a value into an ordered name/value mapping that
//! preserves the type's flattened-element declaration order — not the
//! order fields were supplied at construction, and not XML document
//! order. Nested compound values recurse through their own types.

use indexmap::IndexMap;
use serde_json::{Number, Value as JsonValue};

use crate::error::{Error, Result};
use crate::scalars::ScalarValue;
use crate::types::{TypeDef, TypeGraph, TypeId};
use crate::values::Value;

/// A serialized value
#[derive(Debug, Clone, PartialEq)]
pub enum Serialized {
    /// Absent value
    Null,
    /// A scalar
    Scalar(ScalarValue),
    /// An ordered sequence
    List(Vec<Serialized>),
    /// An ordered name/value mapping in declaration order
    Map(IndexMap<String, Serialized>),
}

impl Serialized {
    /// Convert to a JSON value, preserving map order
    pub fn to_json(&self) -> JsonValue {
        match self {
            Serialized::Null => JsonValue::Null,
            Serialized::Scalar(scalar) => scalar_to_json(scalar),
            Serialized::List(items) => {
                JsonValue::Array(items.iter().map(Serialized::to_json).collect())
            }
            Serialized::Map(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl serde::Serialize for Serialized {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

fn scalar_to_json(scalar: &ScalarValue) -> JsonValue {
    match scalar {
        ScalarValue::String(s) => JsonValue::String(s.clone()),
        ScalarValue::Boolean(b) => JsonValue::Bool(*b),
        ScalarValue::Integer(i) => JsonValue::Number((*i).into()),
        ScalarValue::Double(v) => Number::from_f64(*v)
            .map(JsonValue::Number)
            // INF and NaN have no JSON number form; fall back to the
            // XML spelling
            .unwrap_or_else(|| JsonValue::String(scalar.to_string())),
        // decimal, date/time and binary keep their lexical form
        other => JsonValue::String(other.to_string()),
    }
}

/// Serialize a value of the given type
pub fn serialize(graph: &TypeGraph, id: TypeId, value: &Value) -> Result<Serialized> {
    if let TypeDef::Union(_) = graph.def(graph.follow_alias(id)) {
        return Err(Error::UnsupportedUnion {
            type_name: graph.type_name(id),
            operation: "serialization",
        });
    }

    match value {
        Value::Nil => Ok(Serialized::Null),
        Value::Scalar(scalar) => Ok(Serialized::Scalar(scalar.clone())),
        Value::List(items) => {
            let serialized = items
                .iter()
                .map(|item| serialize(graph, id, item))
                .collect::<Result<Vec<Serialized>>>()?;
            Ok(Serialized::List(serialized))
        }
        Value::Compound(compound) => {
            let effective = graph.effective_of(id)?;
            let mut map = IndexMap::new();
            for (name, element) in &effective.elements {
                let field = compound.get(name).unwrap_or(&Value::Nil);
                map.insert(name.clone(), serialize(graph, element.type_id, field)?);
            }
            Ok(Serialized::Map(map))
        }
    }
}
