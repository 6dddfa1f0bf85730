//! Property value type.

use serde::Serialize;
use std::fmt;

/// A property value as stored on an entity.
///
/// Absence of a property is never a `Value`; lookups return
/// `Option<Value>` and `None` means "no such property on this entity".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 8-bit signed integer.
    Byte(i8),
    /// 16-bit signed integer.
    Short(i16),
    /// Unicode scalar value.
    Char(char),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Text string (UTF-8).
    String(String),
    /// Homogeneous array.
    Array(ArrayValue),
}

/// A homogeneous array property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayValue {
    /// Array of booleans.
    Bool(Vec<bool>),
    /// Array of bytes.
    Byte(Vec<i8>),
    /// Array of shorts.
    Short(Vec<i16>),
    /// Array of chars.
    Char(Vec<char>),
    /// Array of ints.
    Int(Vec<i32>),
    /// Array of longs.
    Long(Vec<i64>),
    /// Array of floats.
    Float(Vec<f32>),
    /// Array of doubles.
    Double(Vec<f64>),
    /// Array of strings.
    String(Vec<String>),
}

impl ArrayValue {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            ArrayValue::Bool(v) => v.len(),
            ArrayValue::Byte(v) => v.len(),
            ArrayValue::Short(v) => v.len(),
            ArrayValue::Char(v) => v.len(),
            ArrayValue::Int(v) => v.len(),
            ArrayValue::Long(v) => v.len(),
            ArrayValue::Float(v) => v.len(),
            ArrayValue::Double(v) => v.len(),
            ArrayValue::String(v) => v.len(),
        }
    }

    /// Returns true if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value {
    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value widened to `i64`, if it is an integral number.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Short(n) => Some(i64::from(*n)),
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value widened to `f64`, if it is a floating point number.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "'{v}'"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Array(a) => match a {
                ArrayValue::Bool(v) => write!(f, "{v:?}"),
                ArrayValue::Byte(v) => write!(f, "{v:?}"),
                ArrayValue::Short(v) => write!(f, "{v:?}"),
                ArrayValue::Char(v) => write!(f, "{v:?}"),
                ArrayValue::Int(v) => write!(f, "{v:?}"),
                ArrayValue::Long(v) => write!(f, "{v:?}"),
                ArrayValue::Float(v) => write!(f, "{v:?}"),
                ArrayValue::Double(v) => write!(f, "{v:?}"),
                ArrayValue::String(v) => write!(f, "{v:?}"),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i8> for Value {
    fn from(n: i8) -> Self {
        Value::Byte(n)
    }
}

impl From<i16> for Value {
    fn from(n: i16) -> Self {
        Value::Short(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
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

impl From<ArrayValue> for Value {
    fn from(a: ArrayValue) -> Self {
        Value::Array(a)
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::Array(ArrayValue::Int(v))
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Array(ArrayValue::Long(v))
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::Array(ArrayValue::String(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(42).as_bool(), None);

        assert_eq!(Value::Byte(-3).as_long(), Some(-3));
        assert_eq!(Value::Short(300).as_long(), Some(300));
        assert_eq!(Value::Int(42).as_long(), Some(42));
        assert_eq!(Value::Long(1 << 40).as_long(), Some(1 << 40));
        assert_eq!(Value::Double(1.5).as_long(), None);

        assert_eq!(Value::Float(0.5).as_double(), Some(0.5));
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert!(Value::from(vec![1i32, 2]).as_array().is_some());
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7i8), Value::Byte(7));
        assert_eq!(Value::from(7i16), Value::Short(7));
        assert_eq!(Value::from('x'), Value::Char('x'));
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(42i64), Value::Long(42));
        assert_eq!(Value::from("a".to_string()), Value::String("a".into()));
        assert_eq!(
            Value::from(vec!["a".to_string()]),
            Value::Array(ArrayValue::String(vec!["a".into()]))
        );
    }

    #[test]
    fn array_len() {
        assert_eq!(ArrayValue::Long(vec![1, 2, 3]).len(), 3);
        assert!(ArrayValue::String(Vec::new()).is_empty());
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Value::from("a").to_string(), "\"a\"");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Char('z').to_string(), "'z'");
        assert_eq!(Value::from(vec![1i32, 2]).to_string(), "[1, 2]");
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&Value::from(vec![1i64, 2])).unwrap();
        assert_eq!(json, "[1,2]");
        let json = serde_json::to_string(&Value::from("x")).unwrap();
        assert_eq!(json, "\"x\"");
    }
}
