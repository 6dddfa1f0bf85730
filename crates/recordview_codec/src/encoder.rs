//! Dynamic payload encoder.
//!
//! Produces the byte payloads that the storage layer splits across dynamic
//! (overflow) records. The view never writes; this side exists for stores
//! and test fixtures.

use crate::error::{CodecError, CodecResult};
use crate::property_type::PropertyType;
use crate::value::{ArrayValue, Value};
use bytes::BufMut;

/// Encode a `String` or `Array` value to its dynamic payload.
///
/// # Errors
///
/// Returns an error for inline types and for arrays with more than
/// `u32::MAX` elements.
pub fn encode_dynamic(value: &Value) -> CodecResult<Vec<u8>> {
    let mut encoder = DynamicEncoder::new();
    encoder.encode(value)?;
    Ok(encoder.into_bytes())
}

/// Encode a sorted label array payload for the label store.
pub fn encode_label_array(labels: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + labels.len() * 4);
    buf.put_u32_le(labels.len() as u32);
    for label in labels {
        buf.put_u32_le(*label);
    }
    buf
}

/// An encoder for dynamic payloads.
#[derive(Debug, Default)]
pub struct DynamicEncoder {
    buffer: Vec<u8>,
}

impl DynamicEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a value.
    pub fn encode(&mut self, value: &Value) -> CodecResult<()> {
        match value {
            Value::String(s) => {
                self.buffer.put_slice(s.as_bytes());
                Ok(())
            }
            Value::Array(array) => self.encode_array(array),
            other => Err(CodecError::invalid_representation(format!(
                "{} values are stored inline",
                PropertyType::of(other)
            ))),
        }
    }

    fn encode_array(&mut self, array: &ArrayValue) -> CodecResult<()> {
        let count = u32::try_from(array.len())
            .map_err(|_| CodecError::invalid_structure("array too long"))?;
        self.buffer.put_u8(PropertyType::of_elements(array).tag());
        self.buffer.put_u32_le(count);

        let buf = &mut self.buffer;
        match array {
            ArrayValue::Bool(v) => v.iter().for_each(|b| buf.put_u8(u8::from(*b))),
            ArrayValue::Byte(v) => v.iter().for_each(|n| buf.put_i8(*n)),
            ArrayValue::Short(v) => v.iter().for_each(|n| buf.put_i16_le(*n)),
            ArrayValue::Char(v) => v.iter().for_each(|c| buf.put_u32_le(u32::from(*c))),
            ArrayValue::Int(v) => v.iter().for_each(|n| buf.put_i32_le(*n)),
            ArrayValue::Long(v) => v.iter().for_each(|n| buf.put_i64_le(*n)),
            ArrayValue::Float(v) => v.iter().for_each(|n| buf.put_f32_le(*n)),
            ArrayValue::Double(v) => v.iter().for_each(|n| buf.put_f64_le(*n)),
            ArrayValue::String(v) => {
                for s in v {
                    let len = u32::try_from(s.len())
                        .map_err(|_| CodecError::invalid_structure("array element too long"))?;
                    buf.put_u32_le(len);
                    buf.put_slice(s.as_bytes());
                }
            }
        }
        Ok(())
    }

    /// Get the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_payload_is_raw_utf8() {
        assert_eq!(encode_dynamic(&Value::from("héllo")).unwrap(), "héllo".as_bytes());
    }

    #[test]
    fn array_payload_layout() {
        let bytes = encode_dynamic(&Value::from(vec![1i32, -1])).unwrap();
        assert_eq!(
            bytes,
            vec![5, 2, 0, 0, 0, 1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn string_array_is_length_prefixed() {
        let bytes = encode_dynamic(&Value::from(vec!["ab".to_string()])).unwrap();
        assert_eq!(bytes, vec![9, 1, 0, 0, 0, 2, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(matches!(
            encode_dynamic(&Value::Int(1)),
            Err(CodecError::InvalidRepresentation { .. })
        ));
    }

    #[test]
    fn label_array_layout() {
        assert_eq!(
            encode_label_array(&[3, 7]),
            vec![2, 0, 0, 0, 3, 0, 0, 0, 7, 0, 0, 0]
        );
        assert_eq!(encode_label_array(&[]), vec![0, 0, 0, 0]);
    }
}
