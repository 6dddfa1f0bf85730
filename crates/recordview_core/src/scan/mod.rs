//! Store scans feeding index population.
//!
//! A scan walks entity ids in ascending order and hands each in-use entity
//! to its visitors. Visitors return `true` to stop the scan; a
//! [`ScanStopHandle`] stops it from another thread. Either way the scan ends
//! between two entities, never inside one.

mod driver;
mod node;
mod relationship;

pub use node::NodeStoreScan;
pub use relationship::RelationshipStoreScan;

pub(crate) use driver::{EntityIds, ScanDriver};

use crate::error::CoreResult;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Receives the items a scan produces.
pub trait Visitor<T> {
    /// Handles one item; returning `true` stops the scan.
    fn visit(&mut self, item: T) -> CoreResult<bool>;
}

impl<T, F> Visitor<T> for F
where
    F: FnMut(T) -> CoreResult<bool>,
{
    fn visit(&mut self, item: T) -> CoreResult<bool> {
        self(item)
    }
}

/// A boxed visitor borrowed for the lifetime of a scan.
pub type BoxedVisitor<'a, T> = Box<dyn Visitor<T> + Send + 'a>;

/// Progress of a running scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PopulationProgress {
    /// Entities processed.
    pub completed: u64,
    /// Entities the scan will visit.
    pub total: u64,
}

impl PopulationProgress {
    /// Progress of a scan that has not started.
    pub const NONE: Self = Self::new(0, 0);

    /// Creates a progress value.
    #[must_use]
    pub const fn new(completed: u64, total: u64) -> Self {
        Self { completed, total }
    }

    /// Completed share in `0.0..=1.0`; an empty scan counts as done.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }
}

/// Cloneable handle that stops a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanStopHandle {
    stopped: Arc<AtomicBool>,
}

impl ScanStopHandle {
    /// Creates a handle that is not stopped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the scan to stop before its next entity.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Cloneable, thread-safe view of a scan's progress.
///
/// The scan updates it as it goes, so other threads (or the scan's own
/// visitors) can poll it while `run` is in progress.
#[derive(Debug, Clone, Default)]
pub struct ScanProgressHandle {
    counters: Arc<ProgressCounters>,
}

#[derive(Debug, Default)]
struct ProgressCounters {
    completed: AtomicU64,
    total: AtomicU64,
}

impl ScanProgressHandle {
    /// Creates a handle at [`PopulationProgress::NONE`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current progress.
    #[must_use]
    pub fn get(&self) -> PopulationProgress {
        // total first, so a reader never sees completed ahead of a fresh total
        let total = self.counters.total.load(Ordering::Acquire);
        let completed = self.counters.completed.load(Ordering::Acquire);
        PopulationProgress::new(completed, total)
    }

    pub(crate) fn start(&self, total: u64) {
        self.counters.completed.store(0, Ordering::Release);
        self.counters.total.store(total, Ordering::Release);
    }

    /// Counts one more processed entity and returns the new count.
    pub(crate) fn advance(&self) -> u64 {
        self.counters.completed.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn completed(&self) -> u64 {
        self.counters.completed.load(Ordering::Acquire)
    }
}

/// A scan over one entity store.
pub trait StoreScan: Send {
    /// Runs the scan to completion, until stopped, or until an error.
    ///
    /// # Errors
    ///
    /// Corruption and visitor errors abort the scan and are returned.
    fn run(&mut self) -> CoreResult<()>;

    /// Handle that stops this scan, usable from other threads.
    fn stop_handle(&self) -> ScanStopHandle;

    /// Requests the scan to stop.
    fn stop(&self) {
        self.stop_handle().stop();
    }

    /// Handle that reads this scan's progress, usable while it runs.
    fn progress_handle(&self) -> ScanProgressHandle;

    /// Current progress.
    fn progress(&self) -> PopulationProgress {
        self.progress_handle().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fraction() {
        assert_eq!(PopulationProgress::NONE.fraction(), 1.0);
        assert_eq!(PopulationProgress::new(1, 4).fraction(), 0.25);
        assert_eq!(PopulationProgress::new(5, 4).fraction(), 1.0);
    }

    #[test]
    fn stop_handle_is_shared() {
        let handle = ScanStopHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_stopped());
        clone.stop();
        assert!(handle.is_stopped());
    }

    #[test]
    fn progress_handle_is_shared() {
        let handle = ScanProgressHandle::new();
        let clone = handle.clone();
        assert_eq!(clone.get(), PopulationProgress::NONE);

        handle.start(4);
        assert_eq!(handle.advance(), 1);
        assert_eq!(clone.get(), PopulationProgress::new(1, 4));

        handle.start(2);
        assert_eq!(clone.get(), PopulationProgress::new(0, 2));
    }

    #[test]
    fn closures_are_visitors() {
        let mut seen = Vec::new();
        let mut visitor = |item: u32| -> CoreResult<bool> {
            seen.push(item);
            Ok(item > 1)
        };
        assert!(!visitor.visit(1).unwrap());
        assert!(visitor.visit(2).unwrap());
        assert_eq!(seen, vec![1, 2]);
    }
}
