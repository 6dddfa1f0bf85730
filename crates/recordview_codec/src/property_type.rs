//! Property type tags.

use crate::error::{CodecError, CodecResult};
use crate::value::{ArrayValue, Value};
use std::fmt;

/// The 4-bit type tag stored in every property block header.
///
/// Tag `0` is reserved for "empty slot" and never maps to a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PropertyType {
    /// Inline boolean.
    Bool = 1,
    /// Inline 8-bit integer.
    Byte = 2,
    /// Inline 16-bit integer.
    Short = 3,
    /// Inline code point.
    Char = 4,
    /// Inline 32-bit integer.
    Int = 5,
    /// Inline 32-bit float.
    Float = 6,
    /// 64-bit integer in a second slot.
    Long = 7,
    /// 64-bit float in a second slot.
    Double = 8,
    /// UTF-8 string in the string store.
    String = 9,
    /// Array in the array store.
    Array = 10,
}

impl PropertyType {
    /// Maps a raw tag to a type.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownType`] for tag `0` and unassigned tags.
    pub const fn from_tag(tag: u8) -> CodecResult<Self> {
        Ok(match tag {
            1 => Self::Bool,
            2 => Self::Byte,
            3 => Self::Short,
            4 => Self::Char,
            5 => Self::Int,
            6 => Self::Float,
            7 => Self::Long,
            8 => Self::Double,
            9 => Self::String,
            10 => Self::Array,
            _ => return Err(CodecError::UnknownType { tag }),
        })
    }

    /// Returns the raw tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Number of 8-byte record slots a block of this type occupies.
    #[must_use]
    pub const fn slot_count(self) -> usize {
        match self {
            Self::Long | Self::Double => 2,
            _ => 1,
        }
    }

    /// Whether the value lives entirely inside the property record.
    #[must_use]
    pub const fn is_inline(self) -> bool {
        !matches!(self, Self::String | Self::Array)
    }

    /// Returns the type a value is stored as.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Bool,
            Value::Byte(_) => Self::Byte,
            Value::Short(_) => Self::Short,
            Value::Char(_) => Self::Char,
            Value::Int(_) => Self::Int,
            Value::Float(_) => Self::Float,
            Value::Long(_) => Self::Long,
            Value::Double(_) => Self::Double,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
        }
    }

    /// Returns the element type of an array value.
    #[must_use]
    pub fn of_elements(array: &ArrayValue) -> Self {
        match array {
            ArrayValue::Bool(_) => Self::Bool,
            ArrayValue::Byte(_) => Self::Byte,
            ArrayValue::Short(_) => Self::Short,
            ArrayValue::Char(_) => Self::Char,
            ArrayValue::Int(_) => Self::Int,
            ArrayValue::Float(_) => Self::Float,
            ArrayValue::Long(_) => Self::Long,
            ArrayValue::Double(_) => Self::Double,
            ArrayValue::String(_) => Self::String,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Float => "float",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_zero_is_reserved() {
        assert_eq!(
            PropertyType::from_tag(0),
            Err(CodecError::UnknownType { tag: 0 })
        );
        assert_eq!(
            PropertyType::from_tag(11),
            Err(CodecError::UnknownType { tag: 11 })
        );
    }

    #[test]
    fn every_type_maps_back_from_its_tag() {
        for tag in 1..=10u8 {
            let ty = PropertyType::from_tag(tag).unwrap();
            assert_eq!(ty.tag(), tag);
        }
    }

    #[test]
    fn wide_scalars_take_two_slots() {
        assert_eq!(PropertyType::Long.slot_count(), 2);
        assert_eq!(PropertyType::Double.slot_count(), 2);
        assert_eq!(PropertyType::Int.slot_count(), 1);
        assert_eq!(PropertyType::String.slot_count(), 1);
    }

    #[test]
    fn only_strings_and_arrays_overflow() {
        assert!(PropertyType::Double.is_inline());
        assert!(!PropertyType::String.is_inline());
        assert!(!PropertyType::Array.is_inline());
    }

    #[test]
    fn type_of_value() {
        assert_eq!(PropertyType::of(&Value::from("a")), PropertyType::String);
        assert_eq!(PropertyType::of(&Value::Long(1)), PropertyType::Long);
        assert_eq!(
            PropertyType::of_elements(&ArrayValue::Char(vec!['a'])),
            PropertyType::Char
        );
    }
}
