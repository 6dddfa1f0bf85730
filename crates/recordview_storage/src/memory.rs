//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// This backend keeps all bytes in a `Vec` and is suitable for:
/// - Unit tests
/// - Scenario tests that mutate records while a scan runs
/// - Ephemeral stores that don't need persistence
///
/// # Thread Safety
///
/// Reads take a shared lock and writes an exclusive one, so a read of one
/// record slot never observes a partially written slot.
///
/// # Example
///
/// ```rust
/// use recordview_storage::{StorageBackend, InMemoryBackend};
///
/// let backend = InMemoryBackend::new();
/// backend.write_at(0, b"test data").unwrap();
/// assert_eq!(backend.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Vec<u8>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing data.
    ///
    /// Useful for feeding hand-crafted (or deliberately corrupt) store bytes.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Returns a copy of all data in the backend.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> StorageResult<()> {
        let data = self.data.read();
        let size = data.len() as u64;
        let end = offset.saturating_add(buf.len() as u64);

        if offset > size || end > size {
            return Err(StorageError::ReadPastEnd {
                offset,
                len: buf.len(),
                size,
            });
        }

        buf.copy_from_slice(&data[offset as usize..end as usize]);
        Ok(())
    }

    fn write_at(&self, offset: u64, new_data: &[u8]) -> StorageResult<()> {
        let out_of_range = || StorageError::OutOfRange {
            offset,
            len: new_data.len(),
        };
        let start = usize::try_from(offset).map_err(|_| out_of_range())?;
        let end = start.checked_add(new_data.len()).ok_or_else(out_of_range)?;

        let mut data = self.data.write();
        if end > data.len() {
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(new_data);
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().len() as u64)
    }

    fn flush(&self) -> StorageResult<()> {
        // Nothing buffered
        Ok(())
    }

    fn sync(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.data().is_empty());
    }

    #[test]
    fn memory_write_then_read() {
        let backend = InMemoryBackend::new();
        backend.write_at(0, b"hello world").unwrap();

        let mut buf = [0u8; 5];
        backend.read_at(6, &mut buf).unwrap();
        assert_eq!(&buf, b"world");
    }

    #[test]
    fn memory_write_past_end_zero_fills() {
        let backend = InMemoryBackend::new();
        backend.write_at(3, b"ab").unwrap();

        assert_eq!(backend.size().unwrap(), 5);
        assert_eq!(backend.data(), vec![0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn memory_overwrite_in_place() {
        let backend = InMemoryBackend::with_data(b"aaaa".to_vec());
        backend.write_at(1, b"bb").unwrap();

        assert_eq!(backend.data(), b"abba".to_vec());
        assert_eq!(backend.size().unwrap(), 4);
    }

    #[test]
    fn memory_read_past_end_fails() {
        let backend = InMemoryBackend::with_data(b"hello".to_vec());

        let mut buf = [0u8; 5];
        let result = backend.read_at(10, &mut buf);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_read_extending_past_end_fails() {
        let backend = InMemoryBackend::with_data(b"hello".to_vec());

        let mut buf = [0u8; 10];
        let result = backend.read_at(3, &mut buf);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_empty_read() {
        let backend = InMemoryBackend::with_data(b"hello".to_vec());

        let mut buf = [0u8; 0];
        assert!(backend.read_at(5, &mut buf).is_ok());
    }

    #[test]
    fn memory_write_at_unaddressable_offset_fails() {
        let backend = InMemoryBackend::new();
        let result = backend.write_at(u64::MAX, b"x");
        assert!(matches!(result, Err(StorageError::OutOfRange { .. })));
        assert_eq!(backend.size().unwrap(), 0);
    }

    #[test]
    fn memory_flush_and_sync_succeed() {
        let backend = InMemoryBackend::new();
        backend.write_at(0, b"data").unwrap();
        assert!(backend.flush().is_ok());
        assert!(backend.sync().is_ok());
    }
}
