//! The id loop shared by node and relationship scans.

use super::{ScanProgressHandle, ScanStopHandle};
use crate::entity::EntityReader;
use crate::error::CoreResult;
use crate::locks::LockService;
use crate::stats::ScanStats;
use crate::store::Stores;
use crate::types::EntityType;
use std::sync::Arc;
use tracing::debug;

/// Which ids a scan visits.
#[derive(Debug, Clone)]
pub(crate) enum EntityIds {
    /// Every slot below the high id of the entity store.
    AllRecords,
    /// The given ids, ascending.
    Candidates(Vec<u64>),
}

/// Drives the per-entity work of a scan: stop checks, locking, progress,
/// logging and error accounting.
pub(crate) struct ScanDriver {
    entity_type: EntityType,
    stores: Arc<Stores>,
    locks: Arc<dyn LockService>,
    stats: Arc<ScanStats>,
    ids: EntityIds,
    stop: ScanStopHandle,
    progress: ScanProgressHandle,
}

impl ScanDriver {
    pub(crate) fn new(
        entity_type: EntityType,
        stores: Arc<Stores>,
        locks: Arc<dyn LockService>,
        stats: Arc<ScanStats>,
        ids: EntityIds,
    ) -> Self {
        Self {
            entity_type,
            stores,
            locks,
            stats,
            ids,
            stop: ScanStopHandle::new(),
            progress: ScanProgressHandle::new(),
        }
    }

    pub(crate) fn ids(&self) -> &EntityIds {
        &self.ids
    }

    pub(crate) fn stats(&self) -> &Arc<ScanStats> {
        &self.stats
    }

    pub(crate) fn stop_handle(&self) -> ScanStopHandle {
        self.stop.clone()
    }

    pub(crate) fn progress_handle(&self) -> ScanProgressHandle {
        self.progress.clone()
    }

    /// Calls `process` for each id under a shared entity lock.
    ///
    /// `process` returns `true` to end the scan.
    pub(crate) fn run<F>(&mut self, mut process: F) -> CoreResult<()>
    where
        F: FnMut(EntityReader<'_>, u64) -> CoreResult<bool>,
    {
        let stores = Arc::clone(&self.stores);
        let locks = Arc::clone(&self.locks);
        let reader = EntityReader::new(&stores);
        let entity_type = self.entity_type;

        let (ids, total): (Box<dyn Iterator<Item = u64>>, u64) = match &self.ids {
            EntityIds::AllRecords => {
                let high_id = match entity_type {
                    EntityType::Node => stores.nodes().high_id()?,
                    EntityType::Relationship => stores.relationships().high_id()?,
                };
                (Box::new(0..high_id), high_id)
            }
            EntityIds::Candidates(ids) => (Box::new(ids.clone().into_iter()), ids.len() as u64),
        };

        self.stats.record_scan();
        self.progress.start(total);
        let interval = stores.config().scan_progress_interval;
        debug!(%entity_type, total, "store scan started");

        for id in ids {
            if self.stop.is_stopped() {
                debug!(%entity_type, completed = self.progress.completed(), "store scan stopped");
                return Ok(());
            }

            let outcome = {
                let _lock = locks.shared_lock(entity_type, id);
                process(reader, id)
            };
            let done = match outcome {
                Ok(done) => done,
                Err(e) => {
                    if e.is_corruption() {
                        self.stats.record_corruption();
                    }
                    debug!(%entity_type, id, error = %e, "store scan failed");
                    return Err(e);
                }
            };

            let completed = self.progress.advance();
            if interval > 0 && completed % interval == 0 {
                debug!(
                    %entity_type,
                    completed,
                    total,
                    "store scan progress"
                );
            }
            if done {
                debug!(%entity_type, id, "store scan stopped by visitor");
                return Ok(());
            }
        }

        debug!(%entity_type, completed = self.progress.completed(), "store scan finished");
        Ok(())
    }
}
