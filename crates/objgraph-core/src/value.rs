//! The input value model: JSON-like values accepted by the converter.
//!
//! [`Value`] is a tagged union over the five supported shapes. Classification
//! happens exactly once, by matching on the variant ([`Value::kind`]); the
//! conversion code never branches on runtime type checks anywhere else.
//! Objects keep property insertion order via `IndexMap`, so repeated
//! conversions enumerate properties deterministically (order is not
//! semantically significant, but determinism keeps batches reproducible).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A JSON-like value: string, number, boolean, object, or array.
///
/// `null` has no representation here on purpose -- it is rejected at
/// construction ([`Value::from_json`]) so the conversion core never has to
/// handle nullish holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Num(f64),
    Str(String),
    Arr(Vec<Value>),
    Obj(IndexMap<String, Value>),
}

/// Shape class of a [`Value`], matching the canonical type nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Str,
    Num,
    Bool,
    Obj,
    Arr,
}

impl ValueKind {
    /// Canonical capitalized type name, as used for type-node lookup.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Str => "String",
            ValueKind::Num => "Number",
            ValueKind::Bool => "Boolean",
            ValueKind::Obj => "Object",
            ValueKind::Arr => "Array",
        }
    }

    /// True for string/number/boolean.
    pub fn is_primitive(&self) -> bool {
        matches!(self, ValueKind::Str | ValueKind::Num | ValueKind::Bool)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl Value {
    /// Classifies this value into its shape class.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::Str,
            Value::Num(_) => ValueKind::Num,
            Value::Bool(_) => ValueKind::Bool,
            Value::Obj(_) => ValueKind::Obj,
            Value::Arr(_) => ValueKind::Arr,
        }
    }

    /// Converts from a `serde_json::Value`.
    ///
    /// `null` (at any depth) is unsupported and fails with
    /// [`CoreError::UnsupportedValue`].
    pub fn from_json(json: &serde_json::Value) -> Result<Self, CoreError> {
        match json {
            serde_json::Value::Null => Err(CoreError::UnsupportedValue {
                found: "null".to_string(),
            }),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                let num = n.as_f64().ok_or_else(|| CoreError::UnsupportedValue {
                    found: format!("non-finite number {n}"),
                })?;
                Ok(Value::Num(num))
            }
            serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
            serde_json::Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(Value::from_json(item)?);
                }
                Ok(Value::Arr(out))
            }
            serde_json::Value::Object(map) => {
                let mut out = IndexMap::with_capacity(map.len());
                for (key, val) in map {
                    out.insert(key.clone(), Value::from_json(val)?);
                }
                Ok(Value::Obj(out))
            }
        }
    }

    /// Converts back to a `serde_json::Value` (used when mirroring objects
    /// into the structured value table).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Num(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Arr(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Obj(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Borrow the property map, if this is an object.
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Obj(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Num(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Arr(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Obj(map)
    }
}
