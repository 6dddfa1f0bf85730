//! Property block header and inline payload packing.
//!
//! A block starts with one 64-bit header slot:
//!
//! ```text
//!  63                    28 27   24 23                 0
//! +------------------------+-------+--------------------+
//! |   payload (36 bits)    |  tag  |   key id (24 bits) |
//! +------------------------+-------+--------------------+
//! ```
//!
//! `Long` and `Double` carry their value in a second slot. `String` and
//! `Array` carry the id of the first dynamic record in the payload.

use crate::error::{CodecError, CodecResult};
use crate::property_type::PropertyType;
use crate::value::Value;

/// Largest property key id a header can hold.
pub const MAX_KEY_ID: u32 = (1 << 24) - 1;

/// Largest payload (and dynamic record id) a header can hold.
pub const MAX_INLINE_PAYLOAD: u64 = (1 << 36) - 1;

const TYPE_SHIFT: u32 = 24;
const TYPE_MASK: u64 = 0xF;
const PAYLOAD_SHIFT: u32 = 28;

/// Unpacked block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Property key id.
    pub key: u32,
    /// Raw type tag (0 = empty slot).
    pub tag: u8,
    /// 36-bit payload.
    pub payload: u64,
}

impl BlockHeader {
    /// Unpacks a raw header slot.
    #[must_use]
    pub const fn unpack(raw: u64) -> Self {
        Self {
            key: (raw & MAX_KEY_ID as u64) as u32,
            tag: ((raw >> TYPE_SHIFT) & TYPE_MASK) as u8,
            payload: raw >> PAYLOAD_SHIFT,
        }
    }

    /// Packs the header into a slot.
    ///
    /// # Errors
    ///
    /// Fails if the key or payload does not fit its field.
    pub fn pack(self) -> CodecResult<u64> {
        if self.key > MAX_KEY_ID {
            return Err(CodecError::KeyOutOfRange { key: self.key });
        }
        if self.payload > MAX_INLINE_PAYLOAD {
            return Err(CodecError::PayloadOverflow {
                payload: self.payload,
            });
        }
        Ok(u64::from(self.key)
            | (u64::from(self.tag) & TYPE_MASK) << TYPE_SHIFT
            | self.payload << PAYLOAD_SHIFT)
    }

    /// Whether this slot terminates the block list of a record.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.tag == 0
    }

    /// Resolves the type tag.
    ///
    /// # Errors
    ///
    /// Fails for the empty tag and unassigned tags.
    pub const fn property_type(self) -> CodecResult<PropertyType> {
        PropertyType::from_tag(self.tag)
    }
}

/// Encodes an inline value into its block slots.
///
/// # Errors
///
/// Fails for `String`/`Array` values (they need a dynamic record, see
/// [`encode_pointer`]) and for keys outside the key space.
pub fn encode_inline(key: u32, value: &Value) -> CodecResult<Vec<u64>> {
    let ty = PropertyType::of(value);
    let (payload, second) = match value {
        Value::Bool(v) => (u64::from(*v), None),
        Value::Byte(v) => (u64::from(*v as u8), None),
        Value::Short(v) => (u64::from(*v as u16), None),
        Value::Char(v) => (u64::from(u32::from(*v)), None),
        Value::Int(v) => (u64::from(*v as u32), None),
        Value::Float(v) => (u64::from(v.to_bits()), None),
        Value::Long(v) => (0, Some(*v as u64)),
        Value::Double(v) => (0, Some(v.to_bits())),
        Value::String(_) | Value::Array(_) => {
            return Err(CodecError::invalid_representation(format!(
                "{ty} values are stored in dynamic records"
            )))
        }
    };

    let header = BlockHeader {
        key,
        tag: ty.tag(),
        payload,
    }
    .pack()?;
    Ok(match second {
        Some(slot) => vec![header, slot],
        None => vec![header],
    })
}

/// Encodes a block pointing at the first dynamic record of a value.
///
/// # Errors
///
/// Fails for inline types, out of range keys and dynamic ids wider than
/// 36 bits.
pub fn encode_pointer(key: u32, ty: PropertyType, dynamic_id: u64) -> CodecResult<u64> {
    if ty.is_inline() {
        return Err(CodecError::invalid_representation(format!(
            "{ty} values are stored inline"
        )));
    }
    BlockHeader {
        key,
        tag: ty.tag(),
        payload: dynamic_id,
    }
    .pack()
}

/// Decodes an inline value from its block slots.
///
/// `slots` must hold exactly [`PropertyType::slot_count`] entries, the
/// header first.
///
/// # Errors
///
/// Fails for dynamic types, a wrong slot count, or an invalid code point.
pub fn decode_inline(ty: PropertyType, slots: &[u64]) -> CodecResult<Value> {
    if slots.len() != ty.slot_count() {
        return Err(CodecError::invalid_structure(format!(
            "{ty} block needs {} slots, got {}",
            ty.slot_count(),
            slots.len()
        )));
    }
    let payload = BlockHeader::unpack(slots[0]).payload;

    Ok(match ty {
        PropertyType::Bool => Value::Bool(payload & 1 == 1),
        PropertyType::Byte => Value::Byte(payload as u8 as i8),
        PropertyType::Short => Value::Short(payload as u16 as i16),
        PropertyType::Char => {
            let code = payload as u32;
            Value::Char(char::from_u32(code).ok_or(CodecError::InvalidChar { code })?)
        }
        PropertyType::Int => Value::Int(payload as u32 as i32),
        PropertyType::Float => Value::Float(f32::from_bits(payload as u32)),
        PropertyType::Long => Value::Long(slots[1] as i64),
        PropertyType::Double => Value::Double(f64::from_bits(slots[1])),
        PropertyType::String | PropertyType::Array => {
            return Err(CodecError::invalid_representation(format!(
                "{ty} values are stored in dynamic records"
            )))
        }
    })
}

/// Returns the dynamic record id a `String`/`Array` block points at.
#[must_use]
pub const fn dynamic_pointer(header: u64) -> u64 {
    BlockHeader::unpack(header).payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_are_packed_in_place() {
        let raw = BlockHeader {
            key: 0x12_3456,
            tag: 5,
            payload: 0xA_BCDE_F012,
        }
        .pack()
        .unwrap();

        assert_eq!(raw & 0xFF_FFFF, 0x12_3456);
        assert_eq!((raw >> 24) & 0xF, 5);
        assert_eq!(raw >> 28, 0xA_BCDE_F012);
    }

    #[test]
    fn zero_slot_is_empty() {
        assert!(BlockHeader::unpack(0).is_empty());
        assert!(BlockHeader::unpack(0).property_type().is_err());
    }

    #[test]
    fn key_out_of_range_is_rejected() {
        let result = encode_inline(MAX_KEY_ID + 1, &Value::Int(1));
        assert_eq!(
            result,
            Err(CodecError::KeyOutOfRange {
                key: MAX_KEY_ID + 1
            })
        );
    }

    #[test]
    fn negative_scalars_survive_sign_truncation() {
        for value in [Value::Byte(-1), Value::Short(-300), Value::Int(i32::MIN)] {
            let slots = encode_inline(9, &value).unwrap();
            let ty = BlockHeader::unpack(slots[0]).property_type().unwrap();
            assert_eq!(decode_inline(ty, &slots).unwrap(), value);
        }
    }

    #[test]
    fn long_uses_second_slot() {
        let slots = encode_inline(3, &Value::Long(-42)).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(BlockHeader::unpack(slots[0]).key, 3);
        assert_eq!(
            decode_inline(PropertyType::Long, &slots).unwrap(),
            Value::Long(-42)
        );
    }

    #[test]
    fn double_keeps_bits() {
        let slots = encode_inline(3, &Value::Double(-0.0)).unwrap();
        let decoded = decode_inline(PropertyType::Double, &slots).unwrap();
        assert_eq!(decoded.as_double().unwrap().to_bits(), (-0.0f64).to_bits());
    }

    #[test]
    fn strings_are_not_inline() {
        assert!(matches!(
            encode_inline(1, &Value::from("a")),
            Err(CodecError::InvalidRepresentation { .. })
        ));
        assert!(matches!(
            decode_inline(PropertyType::String, &[0]),
            Err(CodecError::InvalidRepresentation { .. })
        ));
    }

    #[test]
    fn wrong_slot_count_is_structural_error() {
        assert!(matches!(
            decode_inline(PropertyType::Long, &[0]),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn surrogate_code_point_is_rejected() {
        let raw = BlockHeader {
            key: 1,
            tag: PropertyType::Char.tag(),
            payload: 0xD800,
        }
        .pack()
        .unwrap();
        assert_eq!(
            decode_inline(PropertyType::Char, &[raw]),
            Err(CodecError::InvalidChar { code: 0xD800 })
        );
    }

    #[test]
    fn pointer_block() {
        let raw = encode_pointer(7, PropertyType::String, 1234).unwrap();
        let header = BlockHeader::unpack(raw);
        assert_eq!(header.key, 7);
        assert_eq!(header.property_type().unwrap(), PropertyType::String);
        assert_eq!(dynamic_pointer(raw), 1234);

        assert!(encode_pointer(7, PropertyType::Int, 1).is_err());
        assert!(matches!(
            encode_pointer(7, PropertyType::Array, MAX_INLINE_PAYLOAD + 1),
            Err(CodecError::PayloadOverflow { .. })
        ));
    }
}
