//! # RecordView Codec
//!
//! Property values and their record-level encodings.
//!
//! This crate knows two representations of a property value:
//!
//! - **Inline**: packed into the 8-byte slots of a property block
//!   (booleans, integers, chars, floats; `Long`/`Double` use a second slot)
//! - **Dynamic**: a byte payload spread over a chain of dynamic records
//!   (strings, arrays) and label arrays for entities with many labels
//!
//! Decoding is pure: the same bytes always decode to the same value.
//!
//! ## Usage
//!
//! ```
//! use recordview_codec::{decode_inline, encode_inline, BlockHeader, Value};
//!
//! let slots = encode_inline(4, &Value::Int(42)).unwrap();
//! let header = BlockHeader::unpack(slots[0]);
//! assert_eq!(header.key, 4);
//!
//! let ty = header.property_type().unwrap();
//! assert_eq!(decode_inline(ty, &slots).unwrap(), Value::Int(42));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod decoder;
mod encoder;
mod error;
mod property_type;
mod value;

pub use block::{
    decode_inline, dynamic_pointer, encode_inline, encode_pointer, BlockHeader,
    MAX_INLINE_PAYLOAD, MAX_KEY_ID,
};
pub use decoder::{decode_dynamic, decode_label_array, DynamicDecoder};
pub use encoder::{encode_dynamic, encode_label_array, DynamicEncoder};
pub use error::{CodecError, CodecResult};
pub use property_type::PropertyType;
pub use value::{ArrayValue, Value};
