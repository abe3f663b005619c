//! TOON value tree shared by the encoder and decoder.
//!
//! Objects are `Vec<(String, ToonValue)>` so key order is exactly insertion
//! order; the prompt renderer depends on that to keep fields and rows in
//! document order.

use serde_json::{Map, Number, Value};

/// A TOON document value. Mirrors JSON types but separates integers from
/// floats (TOON preserves the distinction).
#[derive(Debug, Clone, PartialEq)]
pub enum ToonValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<ToonValue>),
    /// Key-value pairs in insertion order.
    Object(Vec<(String, ToonValue)>),
}

impl ToonValue {
    /// True for null, booleans, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ToonValue::Array(_) | ToonValue::Object(_))
    }

    /// Build a single-level record from `(key, value)` pairs.
    pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<ToonValue>,
    {
        ToonValue::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a field of an object value.
    pub fn get(&self, key: &str) -> Option<&ToonValue> {
        match self {
            ToonValue::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ToonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ToonValue]> {
        match self {
            ToonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value`. Non-finite floats become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            ToonValue::Null => Value::Null,
            ToonValue::Bool(b) => Value::Bool(*b),
            ToonValue::Integer(i) => Value::Number((*i).into()),
            ToonValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            ToonValue::String(s) => Value::String(s.clone()),
            ToonValue::Array(items) => Value::Array(items.iter().map(ToonValue::to_json).collect()),
            ToonValue::Object(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl From<&str> for ToonValue {
    fn from(s: &str) -> Self {
        ToonValue::String(s.to_string())
    }
}

impl From<String> for ToonValue {
    fn from(s: String) -> Self {
        ToonValue::String(s)
    }
}

impl From<bool> for ToonValue {
    fn from(b: bool) -> Self {
        ToonValue::Bool(b)
    }
}

impl From<i64> for ToonValue {
    fn from(i: i64) -> Self {
        ToonValue::Integer(i)
    }
}

impl From<f64> for ToonValue {
    fn from(f: f64) -> Self {
        ToonValue::Float(f)
    }
}

impl<T: Into<ToonValue>> From<Option<T>> for ToonValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ToonValue::Null, Into::into)
    }
}

impl From<&Value> for ToonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ToonValue::Null,
            Value::Bool(b) => ToonValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ToonValue::Integer(i),
                None => n.as_f64().map_or(ToonValue::Null, ToonValue::Float),
            },
            Value::String(s) => ToonValue::String(s.clone()),
            Value::Array(items) => ToonValue::Array(items.iter().map(ToonValue::from).collect()),
            Value::Object(map) => ToonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), ToonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for ToonValue {
    fn from(value: Value) -> Self {
        ToonValue::from(&value)
    }
}
