//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while packing or unpacking property payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Unexpected end of input.
    #[error("unexpected end of input: needed {needed} more bytes")]
    UnexpectedEof {
        /// Number of bytes missing.
        needed: usize,
    },

    /// Bytes left over after a complete value was decoded.
    #[error("{count} trailing bytes after value")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },

    /// Invalid UTF-8 string.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// Code point is not a valid `char`.
    #[error("invalid char code point: {code:#x}")]
    InvalidChar {
        /// The offending code point.
        code: u32,
    },

    /// Type tag does not name a known property type.
    #[error("unknown property type tag: {tag}")]
    UnknownType {
        /// The raw tag.
        tag: u8,
    },

    /// Property key id does not fit the block header.
    #[error("property key {key} exceeds the 24-bit key space")]
    KeyOutOfRange {
        /// The rejected key id.
        key: u32,
    },

    /// Value does not fit the 36-bit inline payload.
    #[error("payload {payload:#x} exceeds the inline payload width")]
    PayloadOverflow {
        /// The rejected payload.
        payload: u64,
    },

    /// A block was asked for the wrong representation.
    #[error("invalid block representation: {message}")]
    InvalidRepresentation {
        /// Description of the mismatch.
        message: String,
    },

    /// Invalid payload structure.
    #[error("invalid payload structure: {message}")]
    InvalidStructure {
        /// Description of the structural error.
        message: String,
    },
}

impl CodecError {
    /// Create an invalid representation error.
    pub fn invalid_representation(message: impl Into<String>) -> Self {
        Self::InvalidRepresentation {
            message: message.into(),
        }
    }

    /// Create an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}
