//! Error types for RecordView core.

use crate::types::EntityType;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while reading records and decoding entities.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] recordview_storage::StorageError),

    /// Payload codec error.
    #[error("codec error: {0}")]
    Codec(#[from] recordview_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The entity record is not in use.
    #[error("{entity_type} {id} not found")]
    EntityNotFound {
        /// Node or relationship.
        entity_type: EntityType,
        /// The entity id that was looked up.
        id: u64,
    },

    /// A record read in normal mode is not in use.
    #[error("{store} record {id} is not in use")]
    RecordNotInUse {
        /// Name of the store.
        store: &'static str,
        /// The record id.
        id: u64,
    },

    /// A record id outside the addressable range.
    #[error("invalid {store} record id {id}")]
    InvalidRecordId {
        /// Name of the store.
        store: &'static str,
        /// The rejected id.
        id: u64,
    },

    /// A property or dynamic record chain is damaged.
    #[error("chain corruption: {message}")]
    ChainCorruption {
        /// Description of the corruption.
        message: String,
    },

    /// An in-use record holds bytes that do not decode.
    #[error("invalid {store} record {id}: {message}")]
    InvalidRecord {
        /// Name of the store.
        store: &'static str,
        /// The record id.
        id: u64,
        /// Description of the problem.
        message: String,
    },

    /// Invalid store layout or configuration.
    #[error("invalid store format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates a chain corruption error.
    pub fn chain_corruption(message: impl Into<String>) -> Self {
        Self::ChainCorruption {
            message: message.into(),
        }
    }

    /// Creates an invalid record error.
    pub fn invalid_record(store: &'static str, id: u64, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            store,
            id,
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Whether this error reports a missing entity or record.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EntityNotFound { .. } | Self::RecordNotInUse { .. }
        )
    }

    /// Whether this error reports damaged store contents.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::ChainCorruption { .. } | Self::InvalidRecord { .. } | Self::Codec(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordview_codec::CodecError;

    #[test]
    fn entity_not_found_message() {
        let err = CoreError::EntityNotFound {
            entity_type: EntityType::Node,
            id: 7,
        };
        assert_eq!(err.to_string(), "node 7 not found");
        assert!(err.is_not_found());
        assert!(!err.is_corruption());
    }

    #[test]
    fn corruption_classification() {
        assert!(CoreError::chain_corruption("cycle").is_corruption());
        assert!(CoreError::invalid_record("property", 1, "bad tag").is_corruption());
        assert!(CoreError::from(CodecError::InvalidUtf8).is_corruption());
        assert!(!CoreError::invalid_operation("nope").is_corruption());
    }
}
