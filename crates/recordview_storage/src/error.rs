//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by byte storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A read asked for bytes the store does not hold.
    #[error("read of {len} bytes at offset {offset} passes the end of storage ({size} bytes)")]
    ReadPastEnd {
        /// The requested read offset.
        offset: u64,
        /// The requested read length.
        len: usize,
        /// The current storage size.
        size: u64,
    },

    /// A write whose end offset the backend cannot address.
    #[error("write of {len} bytes at offset {offset} is out of range")]
    OutOfRange {
        /// The requested write offset.
        offset: u64,
        /// The requested write length.
        len: usize,
    },
}
