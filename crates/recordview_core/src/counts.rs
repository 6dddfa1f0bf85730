//! Index counts.
//!
//! Each index has two registers of two numbers each:
//!
//! - **updates and size**: updates since the last sample, and entries
//! - **sample**: unique values, and sample size
//!
//! Views forward their counts operations to a [`CountsStore`].

use crate::types::IndexId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A pair of counters read together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleLong {
    /// First counter.
    pub first: u64,
    /// Second counter.
    pub second: u64,
}

impl DoubleLong {
    /// Creates a register value.
    #[must_use]
    pub const fn new(first: u64, second: u64) -> Self {
        Self { first, second }
    }
}

/// Storage of per-index counters.
///
/// Indexes that were never written read as zero.
pub trait CountsStore: Send + Sync {
    /// Returns `(updates, size)` of an index.
    fn index_updates_and_size(&self, index: IndexId) -> DoubleLong;

    /// Returns `(unique values, sample size)` of an index.
    fn index_sample(&self, index: IndexId) -> DoubleLong;

    /// Overwrites the sample register.
    fn replace_index_sample(&self, index: IndexId, unique_values: u64, sample_size: u64);

    /// Overwrites the updates and size register.
    fn replace_index_updates_and_size(&self, index: IndexId, updates: u64, size: u64);

    /// Adds `delta` to the update counter, saturating at zero.
    fn increment_index_updates(&self, index: IndexId, delta: i64);
}

#[derive(Debug, Clone, Copy, Default)]
struct IndexCounts {
    updates_and_size: DoubleLong,
    sample: DoubleLong,
}

/// An in-memory [`CountsStore`].
#[derive(Debug, Default)]
pub struct InMemoryCountsStore {
    counts: RwLock<HashMap<IndexId, IndexCounts>>,
}

impl InMemoryCountsStore {
    /// Creates an empty counts store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexes with counters.
    pub fn len(&self) -> usize {
        self.counts.read().len()
    }

    /// Whether no index has counters.
    pub fn is_empty(&self) -> bool {
        self.counts.read().is_empty()
    }

    fn get(&self, index: IndexId) -> IndexCounts {
        self.counts.read().get(&index).copied().unwrap_or_default()
    }
}

impl CountsStore for InMemoryCountsStore {
    fn index_updates_and_size(&self, index: IndexId) -> DoubleLong {
        self.get(index).updates_and_size
    }

    fn index_sample(&self, index: IndexId) -> DoubleLong {
        self.get(index).sample
    }

    fn replace_index_sample(&self, index: IndexId, unique_values: u64, sample_size: u64) {
        self.counts.write().entry(index).or_default().sample =
            DoubleLong::new(unique_values, sample_size);
    }

    fn replace_index_updates_and_size(&self, index: IndexId, updates: u64, size: u64) {
        self.counts.write().entry(index).or_default().updates_and_size =
            DoubleLong::new(updates, size);
    }

    fn increment_index_updates(&self, index: IndexId, delta: i64) {
        let mut counts = self.counts.write();
        let register = &mut counts.entry(index).or_default().updates_and_size;
        register.first = register.first.saturating_add_signed(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_index_reads_zero() {
        let counts = InMemoryCountsStore::new();
        assert_eq!(counts.index_sample(IndexId::new(1)), DoubleLong::default());
        assert_eq!(
            counts.index_updates_and_size(IndexId::new(1)),
            DoubleLong::new(0, 0)
        );
        assert!(counts.is_empty());
    }

    #[test]
    fn registers_are_independent() {
        let counts = InMemoryCountsStore::new();
        let index = IndexId::new(3);
        counts.replace_index_sample(index, 10, 100);
        counts.replace_index_updates_and_size(index, 4, 200);

        assert_eq!(counts.index_sample(index), DoubleLong::new(10, 100));
        assert_eq!(counts.index_updates_and_size(index), DoubleLong::new(4, 200));
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn increments_saturate() {
        let counts = InMemoryCountsStore::new();
        let index = IndexId::new(1);
        counts.replace_index_updates_and_size(index, 2, 50);
        counts.increment_index_updates(index, 5);
        assert_eq!(counts.index_updates_and_size(index), DoubleLong::new(7, 50));

        counts.increment_index_updates(index, -10);
        assert_eq!(counts.index_updates_and_size(index), DoubleLong::new(0, 50));
    }
}
