//! Dynamic payload decoder.

use crate::error::{CodecError, CodecResult};
use crate::property_type::PropertyType;
use crate::value::{ArrayValue, Value};
use bytes::Buf;

/// Maximum allowed element count for arrays.
///
/// Guards allocation when a corrupt count field is read.
const MAX_ARRAY_ELEMENTS: u32 = 16 * 1024 * 1024;

/// Decode the dynamic payload of a `String` or `Array` property.
///
/// # Errors
///
/// Returns an error for inline types, truncated or oversized payloads,
/// invalid UTF-8 and invalid element tags.
pub fn decode_dynamic(ty: PropertyType, bytes: &[u8]) -> CodecResult<Value> {
    let mut decoder = DynamicDecoder::new(bytes);
    let value = decoder.decode(ty)?;
    decoder.finish()?;
    Ok(value)
}

/// Decode a label array payload read from the label store.
///
/// The result is sorted and free of duplicates.
///
/// # Errors
///
/// Returns an error if the payload is truncated or has trailing bytes.
pub fn decode_label_array(bytes: &[u8]) -> CodecResult<Vec<u32>> {
    let mut decoder = DynamicDecoder::new(bytes);
    let count = decoder.read_count()?;
    let mut labels = decoder.read_n(count, 4, |d| d.get_u32_le())?;
    decoder.finish()?;
    labels.sort_unstable();
    labels.dedup();
    Ok(labels)
}

/// A decoder over one dynamic payload.
pub struct DynamicDecoder<'a> {
    data: &'a [u8],
}

impl<'a> DynamicDecoder<'a> {
    /// Create a new decoder for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Decode a value of the given dynamic type.
    pub fn decode(&mut self, ty: PropertyType) -> CodecResult<Value> {
        match ty {
            PropertyType::String => {
                let len = self.data.remaining();
                self.read_string(len).map(Value::String)
            }
            PropertyType::Array => self.decode_array().map(Value::Array),
            other => Err(CodecError::invalid_representation(format!(
                "{other} values are stored inline"
            ))),
        }
    }

    /// Fails if any bytes were left unread.
    pub fn finish(&self) -> CodecResult<()> {
        match self.data.remaining() {
            0 => Ok(()),
            count => Err(CodecError::TrailingBytes { count }),
        }
    }

    fn decode_array(&mut self) -> CodecResult<ArrayValue> {
        self.ensure(1)?;
        let element = PropertyType::from_tag(self.data.get_u8())?;
        let count = self.read_count()?;

        Ok(match element {
            PropertyType::Bool => ArrayValue::Bool(self.read_n(count, 1, |d| d.get_u8() != 0)?),
            PropertyType::Byte => ArrayValue::Byte(self.read_n(count, 1, |d| d.get_i8())?),
            PropertyType::Short => ArrayValue::Short(self.read_n(count, 2, |d| d.get_i16_le())?),
            PropertyType::Int => ArrayValue::Int(self.read_n(count, 4, |d| d.get_i32_le())?),
            PropertyType::Long => ArrayValue::Long(self.read_n(count, 8, |d| d.get_i64_le())?),
            PropertyType::Float => ArrayValue::Float(self.read_n(count, 4, |d| d.get_f32_le())?),
            PropertyType::Double => {
                ArrayValue::Double(self.read_n(count, 8, |d| d.get_f64_le())?)
            }
            PropertyType::Char => {
                let codes = self.read_n(count, 4, |d| d.get_u32_le())?;
                let chars = codes
                    .into_iter()
                    .map(|code| char::from_u32(code).ok_or(CodecError::InvalidChar { code }))
                    .collect::<CodecResult<Vec<_>>>()?;
                ArrayValue::Char(chars)
            }
            PropertyType::String => {
                // every string carries at least its length prefix
                self.ensure(count * 4)?;
                let mut strings = Vec::with_capacity(count);
                for _ in 0..count {
                    self.ensure(4)?;
                    let len = self.data.get_u32_le() as usize;
                    strings.push(self.read_string(len)?);
                }
                ArrayValue::String(strings)
            }
            PropertyType::Array => {
                return Err(CodecError::invalid_structure("nested arrays are not supported"))
            }
        })
    }

    fn read_count(&mut self) -> CodecResult<usize> {
        self.ensure(4)?;
        let count = self.data.get_u32_le();
        if count > MAX_ARRAY_ELEMENTS {
            return Err(CodecError::invalid_structure(format!(
                "element count {count} exceeds limit"
            )));
        }
        Ok(count as usize)
    }

    fn read_n<T>(
        &mut self,
        count: usize,
        width: usize,
        read: impl Fn(&mut &'a [u8]) -> T,
    ) -> CodecResult<Vec<T>> {
        self.ensure(count * width)?;
        Ok((0..count).map(|_| read(&mut self.data)).collect())
    }

    fn read_string(&mut self, len: usize) -> CodecResult<String> {
        self.ensure(len)?;
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        String::from_utf8(head.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }

    fn ensure(&self, len: usize) -> CodecResult<()> {
        let remaining = self.data.remaining();
        if remaining < len {
            return Err(CodecError::UnexpectedEof {
                needed: len - remaining,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode_dynamic, encode_label_array};

    #[test]
    fn decodes_string() {
        let bytes = encode_dynamic(&Value::from("long string value")).unwrap();
        assert_eq!(
            decode_dynamic(PropertyType::String, &bytes).unwrap(),
            Value::from("long string value")
        );
    }

    #[test]
    fn decodes_every_array_kind() {
        let arrays = vec![
            ArrayValue::Bool(vec![true, false]),
            ArrayValue::Byte(vec![-1, 2]),
            ArrayValue::Short(vec![-300, 300]),
            ArrayValue::Char(vec!['a', 'é']),
            ArrayValue::Int(vec![i32::MIN, 0]),
            ArrayValue::Long(vec![i64::MAX]),
            ArrayValue::Float(vec![1.5]),
            ArrayValue::Double(vec![-2.25]),
            ArrayValue::String(vec!["x".into(), String::new()]),
        ];
        for array in arrays {
            let value = Value::Array(array);
            let bytes = encode_dynamic(&value).unwrap();
            assert_eq!(decode_dynamic(PropertyType::Array, &bytes).unwrap(), value);
        }
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(
            decode_dynamic(PropertyType::String, &[0xFF, 0xFE]),
            Err(CodecError::InvalidUtf8)
        );
    }

    #[test]
    fn truncated_array_is_rejected() {
        let mut bytes = encode_dynamic(&Value::from(vec![1i64, 2])).unwrap();
        bytes.truncate(bytes.len() - 3);
        assert_eq!(
            decode_dynamic(PropertyType::Array, &bytes),
            Err(CodecError::UnexpectedEof { needed: 3 })
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = encode_dynamic(&Value::from(vec![1i32])).unwrap();
        bytes.push(0);
        assert_eq!(
            decode_dynamic(PropertyType::Array, &bytes),
            Err(CodecError::TrailingBytes { count: 1 })
        );
    }

    #[test]
    fn huge_count_is_rejected_before_allocating() {
        let bytes = [PropertyType::Long.tag(), 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            decode_dynamic(PropertyType::Array, &bytes),
            Err(CodecError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn short_payloads_fail_before_reserving_elements() {
        let mut strings = vec![PropertyType::String.tag()];
        strings.extend_from_slice(&MAX_ARRAY_ELEMENTS.to_le_bytes());
        strings.extend_from_slice(&[0; 5]);
        assert_eq!(
            decode_dynamic(PropertyType::Array, &strings),
            Err(CodecError::UnexpectedEof {
                needed: MAX_ARRAY_ELEMENTS as usize * 4 - 5
            })
        );

        let mut labels = MAX_ARRAY_ELEMENTS.to_le_bytes().to_vec();
        labels.extend_from_slice(&[0; 5]);
        assert_eq!(
            decode_label_array(&labels),
            Err(CodecError::UnexpectedEof {
                needed: MAX_ARRAY_ELEMENTS as usize * 4 - 5
            })
        );
    }

    #[test]
    fn inline_type_is_rejected() {
        assert!(matches!(
            decode_dynamic(PropertyType::Int, &[]),
            Err(CodecError::InvalidRepresentation { .. })
        ));
    }

    #[test]
    fn label_array_is_sorted_and_deduplicated() {
        let bytes = encode_label_array(&[9, 3, 9, 1]);
        assert_eq!(decode_label_array(&bytes).unwrap(), vec![1, 3, 9]);
    }

    #[test]
    fn empty_label_array() {
        assert!(decode_label_array(&encode_label_array(&[])).unwrap().is_empty());
        assert!(matches!(
            decode_label_array(&[1, 0]),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }
}
