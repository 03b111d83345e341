//! # Value Trees
//!
//! The dynamically-typed, schema-free structure the codec consumes and
//! produces.
//!
//! A value tree carries no schema identity of its own: the encoder validates
//! it against a [`Type`](crate::Type) at encode time, and the decoder builds
//! one while walking a buffer. Absent optional fields are simply absent from
//! their struct map; there is no null placeholder variant.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Field-name → value mapping of a struct node.
pub type Map = HashMap<String, Value>;

/// A dynamically-typed protocol value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    Bool(bool),
    /// UTF-8 string payload.
    Str(String),
    /// Raw byte payload (string fields flagged as not-UTF-8).
    Bytes(Vec<u8>),
    Double(f64),
    /// Ordered element sequence.
    Array(Vec<Value>),
    /// Nested field-name → value mapping.
    Struct(Map),
}

impl Value {
    /// Human-readable variant name, used in mismatch diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Double(_) => "double",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Map> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }

    /// Fetch a field of a struct value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_struct()?.get(field)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Struct(v)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Struct(iter.into_iter().collect())
    }
}
