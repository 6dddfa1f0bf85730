//! Dynamic record stores and chain reads.

use super::{RecordLoad, RecordStore};
use crate::error::{CoreError, CoreResult};
use crate::record::{DynamicRecord, Record};
use recordview_storage::StorageBackend;
use std::collections::HashSet;
use tracing::warn;

/// A store of dynamic records holding chained payloads.
///
/// The string, array and label stores are all dynamic stores; they differ
/// only in name and in what their payloads decode to.
#[derive(Debug)]
pub struct DynamicStore {
    name: &'static str,
    records: RecordStore<DynamicRecord>,
    max_chain_length: usize,
}

impl DynamicStore {
    /// Opens a dynamic store.
    ///
    /// # Errors
    ///
    /// Fails for slot sizes below [`DynamicRecord::MIN_SIZE`] and backend
    /// errors.
    pub fn new(
        name: &'static str,
        backend: Box<dyn StorageBackend>,
        record_size: usize,
        max_chain_length: usize,
    ) -> CoreResult<Self> {
        if record_size < DynamicRecord::MIN_SIZE {
            return Err(CoreError::invalid_format(format!(
                "{name} store record size {record_size} is below {}",
                DynamicRecord::MIN_SIZE
            )));
        }
        Ok(Self {
            name,
            records: RecordStore::new(backend, record_size)?,
            max_chain_length,
        })
    }

    /// Store name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The underlying record store.
    #[must_use]
    pub fn records(&self) -> &RecordStore<DynamicRecord> {
        &self.records
    }

    /// Reads the payload of the chain starting at `head`.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::ChainCorruption`] if the chain revisits a
    /// record, reaches a record that is not in use, does not begin with a
    /// start record, runs into another start record or grows past the
    /// configured length.
    pub fn read_chain(&self, head: u64) -> CoreResult<Vec<u8>> {
        let mut payload = Vec::new();
        let mut visited = HashSet::new();
        let mut record = self.records.new_record();
        let mut next = Some(head);

        while let Some(id) = next {
            if !visited.insert(id) {
                return Err(self.corruption(head, format!("record {id} is revisited")));
            }
            if visited.len() > self.max_chain_length {
                return Err(self.corruption(
                    head,
                    format!("chain exceeds {} records", self.max_chain_length),
                ));
            }

            self.records.get_record(id, &mut record, RecordLoad::Force)?;
            if !record.in_use() {
                return Err(self.corruption(head, format!("record {id} is not in use")));
            }
            if record.is_start() != (id == head) {
                let reason = if id == head {
                    "head is not a start record".to_string()
                } else {
                    format!("record {id} starts another chain")
                };
                return Err(self.corruption(head, reason));
            }

            payload.extend_from_slice(record.data());
            next = record.next();
        }
        Ok(payload)
    }

    /// Writes `payload` to freshly allocated records and returns the head.
    ///
    /// An empty payload still takes one record.
    ///
    /// # Errors
    ///
    /// Propagates id exhaustion and backend errors.
    pub fn write_chain(&self, payload: &[u8]) -> CoreResult<u64> {
        let capacity = DynamicRecord::capacity(self.records.record_size());
        let chunks: Vec<&[u8]> = if payload.is_empty() {
            vec![payload]
        } else {
            payload.chunks(capacity).collect()
        };
        let ids = chunks
            .iter()
            .map(|_| self.records.allocate_id())
            .collect::<CoreResult<Vec<_>>>()?;

        for (i, chunk) in chunks.iter().enumerate() {
            let record = DynamicRecord::new(ids[i], i == 0, ids.get(i + 1).copied(), chunk.to_vec());
            self.records.write_record(&record)?;
        }
        Ok(ids[0])
    }

    fn corruption(&self, head: u64, reason: String) -> CoreError {
        warn!(store = self.name, head, %reason, "dynamic chain corrupted");
        CoreError::chain_corruption(format!("{} chain from {head}: {reason}", self.name))
    }
}
