//! Key-value attribute types for log records, resources, and scopes.
//!
//! Attributes are key-value pairs that provide additional context for log
//! records, the producing entity ([`Resource`]), and the instrumentation
//! scope.
//!
//! Unlike transient wire types, these are owned values: they are stored in
//! provider-lifetime structures (resources, scope keys) and must be usable
//! as hash-map keys, so equality and hashing are defined for every variant
//! (floating point values compare by bit pattern).
//!
//! [`Resource`]: crate::Resource
//!
//! # Examples
//!
//! ```rust
//! use lumen_logs::{KeyValue, Value};
//!
//! let user_id = KeyValue::new("user_id", 123);
//! let username = KeyValue::new("username", "alice");
//! let is_admin = KeyValue::new("is_admin", true);
//! let score = KeyValue::new("score", 95.5);
//!
//! assert_eq!(username.value, Value::String("alice".into()));
//! ```

use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A key-value attribute pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    /// The attribute key (name).
    pub key: String,
    /// The attribute value.
    pub value: Value,
}

impl KeyValue {
    /// Creates a new key-value attribute pair.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lumen_logs::KeyValue;
    ///
    /// let user_id = KeyValue::new("user_id", 123);
    /// let username = KeyValue::new("username", "alice");
    /// ```
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl core::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// A value that can be stored in an attribute.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    /// A string value.
    String(String),
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    I64(i64),
    /// A 64-bit floating-point number.
    F64(f64),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            // Bitwise comparison so values containing floats can act as map
            // keys; NaN equals NaN with the same bit pattern.
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::String(value) => value.hash(state),
            Value::Bool(value) => value.hash(state),
            Value::I64(value) => value.hash(state),
            Value::F64(value) => value.to_bits().hash(state),
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            // For strings, debug print so they will get delimiters, since we
            // are explicitly representing strings rather than directly
            // human-targeted text, and they will be used in situations where
            // knowing where the string ends is important.
            Value::String(value) => write!(f, "{value:?}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::I64(value) => write!(f, "{value}"),
            Value::F64(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I64(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}
