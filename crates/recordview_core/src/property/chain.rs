//! Property chain walking.

use crate::error::{CoreError, CoreResult};
use crate::record::{PropertyRecord, Record};
use crate::store::{RecordLoad, RecordStore};
use std::collections::HashSet;
use tracing::warn;

/// Iterator over the property records of one entity.
///
/// Yields records in chain order starting at the head. A revisited record,
/// a record that is not in use or a chain longer than the configured limit
/// yields one [`CoreError::ChainCorruption`] and ends the iteration.
pub struct PropertyChain<'a> {
    store: &'a RecordStore<PropertyRecord>,
    head: Option<u64>,
    next: Option<u64>,
    visited: HashSet<u64>,
    max_length: usize,
}

impl<'a> PropertyChain<'a> {
    /// Creates a walk from `head`; `None` is an empty chain.
    #[must_use]
    pub fn new(store: &'a RecordStore<PropertyRecord>, head: Option<u64>, max_length: usize) -> Self {
        Self {
            store,
            head,
            next: head,
            visited: HashSet::new(),
            max_length,
        }
    }

    fn step(&mut self, id: u64) -> CoreResult<PropertyRecord> {
        if !self.visited.insert(id) {
            return Err(self.corruption(format!("record {id} is revisited")));
        }
        if self.visited.len() > self.max_length {
            return Err(self.corruption(format!("chain exceeds {} records", self.max_length)));
        }

        let mut record = self.store.new_record();
        self.store.get_record(id, &mut record, RecordLoad::Force)?;
        if !record.in_use() {
            return Err(self.corruption(format!("record {id} is not in use")));
        }
        Ok(record)
    }

    fn corruption(&self, reason: String) -> CoreError {
        let head = self.head.unwrap_or_default();
        warn!(head, %reason, "property chain corrupted");
        CoreError::chain_corruption(format!("property chain from {head}: {reason}"))
    }
}

impl Iterator for PropertyChain<'_> {
    type Item = CoreResult<PropertyRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.step(id) {
            Ok(record) => {
                self.next = record.next_prop();
                Some(Ok(record))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl std::iter::FusedIterator for PropertyChain<'_> {}
