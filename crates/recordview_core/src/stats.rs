//! View statistics.
//!
//! Counters shared by a view and every scan it starts.
//!
//! # Usage
//!
//! ```rust,ignore
//! let view = RecordIndexStoreView::new(stores, locks, counts);
//! view.visit_nodes(&[], PropertyKeyFilter::All, Some(visitor), None, false).run()?;
//!
//! let stats = view.stats().snapshot();
//! println!("read {} nodes, {} updates", stats.entities_read, stats.entity_updates);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics of a store view.
///
/// All counters are atomic and can be read while a scan is running.
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Scans started.
    scans: AtomicU64,
    /// Entity records read by scans.
    entities_read: AtomicU64,
    /// Entity records skipped because they are not in use.
    entities_skipped: AtomicU64,
    /// In-use entities that produced no property update.
    sparse_skipped: AtomicU64,
    /// Label updates delivered.
    label_updates: AtomicU64,
    /// Entity property updates delivered.
    entity_updates: AtomicU64,
    /// Single-entity lookups and loads.
    lookups: AtomicU64,
    /// Corruption errors raised.
    corruptions: AtomicU64,
}

impl ScanStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_scan(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_entity_read(&self) {
        self.entities_read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_entity_skipped(&self) {
        self.entities_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sparse_skip(&self) {
        self.sparse_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_label_update(&self) {
        self.label_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_entity_update(&self) {
        self.entity_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_corruption(&self) {
        self.corruptions.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of scans started.
    pub fn scans(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    /// Returns the number of entity records read by scans.
    pub fn entities_read(&self) -> u64 {
        self.entities_read.load(Ordering::Relaxed)
    }

    /// Returns the number of unused entity records skipped.
    pub fn entities_skipped(&self) -> u64 {
        self.entities_skipped.load(Ordering::Relaxed)
    }

    /// Returns the number of in-use entities without a property update.
    pub fn sparse_skipped(&self) -> u64 {
        self.sparse_skipped.load(Ordering::Relaxed)
    }

    /// Returns the number of label updates delivered.
    pub fn label_updates(&self) -> u64 {
        self.label_updates.load(Ordering::Relaxed)
    }

    /// Returns the number of entity updates delivered.
    pub fn entity_updates(&self) -> u64 {
        self.entity_updates.load(Ordering::Relaxed)
    }

    /// Returns the number of single-entity lookups.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Returns the number of corruption errors.
    pub fn corruptions(&self) -> u64 {
        self.corruptions.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> ScanStatsSnapshot {
        ScanStatsSnapshot {
            scans: self.scans(),
            entities_read: self.entities_read(),
            entities_skipped: self.entities_skipped(),
            sparse_skipped: self.sparse_skipped(),
            label_updates: self.label_updates(),
            entity_updates: self.entity_updates(),
            lookups: self.lookups(),
            corruptions: self.corruptions(),
        }
    }
}

/// A point-in-time snapshot of [`ScanStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScanStatsSnapshot {
    /// Scans started.
    pub scans: u64,
    /// Entity records read by scans.
    pub entities_read: u64,
    /// Unused entity records skipped.
    pub entities_skipped: u64,
    /// In-use entities without a property update.
    pub sparse_skipped: u64,
    /// Label updates delivered.
    pub label_updates: u64,
    /// Entity updates delivered.
    pub entity_updates: u64,
    /// Single-entity lookups.
    pub lookups: u64,
    /// Corruption errors.
    pub corruptions: u64,
}
