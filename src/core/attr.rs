//! Typed attributes and the normalizer for call-site argument lists
//!
//! This module provides:
//! - `Value`: a typed attribute value that keeps its JSON type
//! - `Attr`: one key/value pair
//! - `Arg`: one positional element of a logging call
//! - `normalize_attrs`: turns `Arg`s into `Attr`s without ever failing

use serde::Serialize;
use std::fmt;

/// Value recorded for a key that was passed without a value.
pub const MISSING_VALUE: &str = "(MISSING)";

/// Well-known keys, in the order every handler emits them.
pub const ATTR_ORDER: [&str; 4] = ["time", "level", "msg", "source"];

/// Key of the stack trace attribute attached to trace and fatal records.
pub const TRACE_KEY: &str = "trace";

/// True if `key` is one of the record's own fields.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    ATTR_ORDER.contains(&key)
}

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Nested objects and arrays keep their shape in JSON output.
    Json(serde_json::Value),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Json(v) => write!(f, "{}", v),
            Value::Null => write!(f, "null"),
        }
    }
}

impl Value {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Uint(u) => serde_json::Value::Number((*u).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Json(v) => v.clone(),
            Value::Null => serde_json::Value::Null,
        }
    }

    fn is_empty_text(&self) -> bool {
        matches!(self, Value::String(s) if s.is_empty())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u64::from(u))
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::Uint(u as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            other => Value::Json(other),
        }
    }
}

impl From<Attr> for Value {
    fn from(attr: Attr) -> Self {
        let mut object = serde_json::Map::new();
        object.insert(attr.key, attr.value.to_json_value());
        Value::Json(serde_json::Value::Object(object))
    }
}

/// One structured key/value pair attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Attributes with neither key nor value carry nothing and are skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && (self.value == Value::Null || self.value.is_empty_text())
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// One positional element of a logging call.
///
/// Build lists with the [`args!`](crate::args) macro, which converts every
/// element through `Into<Arg>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A pre-built attribute, taken as-is.
    Attr(Attr),
    /// Text: a key at a key position, a value otherwise.
    Str(String),
    /// Any other value; never valid as a key.
    Value(Value),
}

impl From<Attr> for Arg {
    fn from(attr: Attr) -> Self {
        Arg::Attr(attr)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Str(s.clone())
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

macro_rules! arg_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

arg_from_value!(i64, i32, u64, u32, usize, f64, bool, serde_json::Value);

/// Turn a positional argument list into ordered attributes.
///
/// Strings at key positions become keys and take the next element as their
/// value. A trailing key gets [`MISSING_VALUE`]. Anything else at a key
/// position is skipped together with the element after it.
pub fn normalize_attrs<I>(args: I) -> Vec<Attr>
where
    I: IntoIterator<Item = Arg>,
{
    let mut args = args.into_iter();
    let mut attrs = Vec::new();

    while let Some(arg) = args.next() {
        match arg {
            Arg::Attr(attr) => attrs.push(attr),
            Arg::Str(key) => {
                let value = match args.next() {
                    Some(Arg::Str(s)) => Value::String(s),
                    Some(Arg::Value(v)) => v,
                    Some(Arg::Attr(a)) => Value::from(a),
                    None => Value::String(MISSING_VALUE.to_string()),
                };
                attrs.push(Attr { key, value });
            }
            Arg::Value(_) => {
                // resync on the next key position
                let _ = args.next();
            }
        }
    }

    attrs
}
