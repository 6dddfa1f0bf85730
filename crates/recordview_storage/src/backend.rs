//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level positional byte store.
///
/// Record stores lay fixed-size slots over a backend at `id * record_size`.
/// Backends do not understand records; a slot that was never written reads
/// back as zeros once the backend has grown past it.
///
/// # Invariants
///
/// - `read_at` fills the whole buffer or fails, it never returns short reads
/// - `write_at` past the current end zero-fills the gap and grows `size`
/// - A single `read_at` never observes a half-applied `write_at` of the same
///   range
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For store files
pub trait StorageBackend: Send + Sync {
    /// Reads `buf.len()` bytes starting at `offset` into `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The read would extend beyond the current size
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> StorageResult<()>;

    /// Writes `data` at `offset`, growing the storage when needed.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn write_at(&self, offset: u64, data: &[u8]) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Flushes pending writes to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&self) -> StorageResult<()>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// This is a stronger guarantee than `flush`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&self) -> StorageResult<()>;
}
