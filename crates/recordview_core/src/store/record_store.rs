//! Fixed-slot record store.

use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use crate::types::MAX_RECORD_ID;
use recordview_storage::StorageBackend;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

/// How a read treats records that are not in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLoad {
    /// Fail with [`CoreError::RecordNotInUse`].
    Normal,
    /// Return the record; the caller checks [`Record::in_use`].
    Force,
}

/// A store of fixed-size records of type `R`.
pub struct RecordStore<R: Record> {
    backend: Box<dyn StorageBackend>,
    record_size: usize,
    next_id: AtomicU64,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> RecordStore<R> {
    /// Opens a store over `backend` with the given slot size.
    ///
    /// # Errors
    ///
    /// Fails if the backend size cannot be read.
    pub fn new(backend: Box<dyn StorageBackend>, record_size: usize) -> CoreResult<Self> {
        if record_size == 0 {
            return Err(CoreError::invalid_format(format!(
                "{} store needs a non-zero record size",
                R::STORE
            )));
        }
        let high_id = backend.size()? / record_size as u64;
        Ok(Self {
            backend,
            record_size,
            next_id: AtomicU64::new(high_id),
            _marker: PhantomData,
        })
    }

    /// Slot size in bytes.
    #[must_use]
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Number of complete slots in the store.
    ///
    /// Every id below the high id can be read; ids at or above it read as
    /// unused records.
    ///
    /// # Errors
    ///
    /// Fails if the backend size cannot be read.
    pub fn high_id(&self) -> CoreResult<u64> {
        Ok(self.backend.size()? / self.record_size as u64)
    }

    /// Creates an empty scratch record for this store.
    #[must_use]
    pub fn new_record(&self) -> R {
        R::default()
    }

    /// Reads record `id` into `record`.
    ///
    /// Ids past the end of the store read as unused records. With
    /// [`RecordLoad::Normal`] an unused record fails with
    /// [`CoreError::RecordNotInUse`]; with [`RecordLoad::Force`] it is
    /// returned and `record.in_use()` is false.
    ///
    /// # Errors
    ///
    /// Fails for ids outside the addressable range, backend errors and
    /// in-use slots whose bytes do not decode.
    pub fn get_record(&self, id: u64, record: &mut R, mode: RecordLoad) -> CoreResult<()> {
        let offset = self.offset(id)?;
        let size = self.backend.size()?;

        if offset + self.record_size as u64 > size {
            record.reset(id);
        } else {
            let mut buf = vec![0u8; self.record_size];
            self.backend.read_at(offset, &mut buf)?;
            record.decode_into(id, &buf)?;
        }

        if mode == RecordLoad::Normal && !record.in_use() {
            return Err(CoreError::RecordNotInUse { store: R::STORE, id });
        }
        Ok(())
    }

    /// Writes `record` into its slot, growing the store if needed.
    ///
    /// # Errors
    ///
    /// Fails for ids outside the addressable range, records that do not
    /// fit the slot and backend errors.
    pub fn write_record(&self, record: &R) -> CoreResult<()> {
        let id = record.id();
        let offset = self.offset(id)?;
        let mut buf = vec![0u8; self.record_size];
        record.encode_into(&mut buf)?;
        self.backend.write_at(offset, &buf)?;
        self.next_id.fetch_max(id + 1, Ordering::AcqRel);
        Ok(())
    }

    /// Reserves a fresh id past every id handed out or written so far.
    ///
    /// # Errors
    ///
    /// Fails once the id space is exhausted.
    pub fn allocate_id(&self) -> CoreResult<u64> {
        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        if id > MAX_RECORD_ID {
            return Err(CoreError::invalid_operation(format!(
                "{} store is out of ids",
                R::STORE
            )));
        }
        Ok(id)
    }

    /// Flushes buffered writes.
    ///
    /// # Errors
    ///
    /// Propagates backend errors.
    pub fn flush(&self) -> CoreResult<()> {
        self.backend.flush()?;
        Ok(())
    }

    fn offset(&self, id: u64) -> CoreResult<u64> {
        if id > MAX_RECORD_ID {
            return Err(CoreError::InvalidRecordId { store: R::STORE, id });
        }
        Ok(id * self.record_size as u64)
    }
}

impl<R: Record> std::fmt::Debug for RecordStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("store", &R::STORE)
            .field("record_size", &self.record_size)
            .finish_non_exhaustive()
    }
}
