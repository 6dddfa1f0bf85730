//! Entity locks taken by scans.
//!
//! A scan holds a shared lock on each entity while it reads the entity and
//! its property chain. Writers that take the exclusive lock for the same
//! entity therefore never race with the read of that entity.

use crate::types::EntityType;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Hands out per-entity locks.
pub trait LockService: Send + Sync {
    /// Acquires a shared lock on an entity, held until the guard drops.
    fn shared_lock(&self, entity_type: EntityType, id: u64) -> EntityLock<'_>;
}

/// Guard of a shared entity lock.
#[must_use = "the lock is released when the guard is dropped"]
pub struct EntityLock<'a> {
    _guard: Option<RwLockReadGuard<'a, ()>>,
}

impl EntityLock<'_> {
    /// A guard that holds nothing.
    pub fn none() -> Self {
        Self { _guard: None }
    }
}

/// Lock service for stores nobody writes to while views read them.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLockService;

impl LockService for NoLockService {
    fn shared_lock(&self, _entity_type: EntityType, _id: u64) -> EntityLock<'_> {
        EntityLock::none()
    }
}

/// Lock service mapping entities onto a fixed set of lock stripes.
///
/// Two entities may share a stripe; that only makes them wait for each
/// other, never lets a writer in early.
#[derive(Debug)]
pub struct StripedLockService {
    nodes: Vec<RwLock<()>>,
    relationships: Vec<RwLock<()>>,
}

impl StripedLockService {
    /// Stripes per entity type by default.
    pub const DEFAULT_STRIPES: usize = 128;

    /// Creates a service with `stripes` locks per entity type.
    #[must_use]
    pub fn new(stripes: usize) -> Self {
        let stripes = stripes.max(1);
        Self {
            nodes: (0..stripes).map(|_| RwLock::new(())).collect(),
            relationships: (0..stripes).map(|_| RwLock::new(())).collect(),
        }
    }

    /// Acquires the exclusive lock a writer holds while changing an entity.
    pub fn exclusive_lock(&self, entity_type: EntityType, id: u64) -> RwLockWriteGuard<'_, ()> {
        self.stripe(entity_type, id).write()
    }

    fn stripe(&self, entity_type: EntityType, id: u64) -> &RwLock<()> {
        let stripes = match entity_type {
            EntityType::Node => &self.nodes,
            EntityType::Relationship => &self.relationships,
        };
        &stripes[(id % stripes.len() as u64) as usize]
    }
}

impl Default for StripedLockService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STRIPES)
    }
}

impl LockService for StripedLockService {
    fn shared_lock(&self, entity_type: EntityType, id: u64) -> EntityLock<'_> {
        EntityLock {
            _guard: Some(self.stripe(entity_type, id).read()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn shared_locks_do_not_block_each_other() {
        let locks = StripedLockService::new(4);
        let _a = locks.shared_lock(EntityType::Node, 1);
        let _b = locks.shared_lock(EntityType::Node, 1);
        let _c = NoLockService.shared_lock(EntityType::Node, 1);
    }

    #[test]
    fn exclusive_lock_blocks_shared_lock() {
        let locks = StripedLockService::new(4);
        let acquired = AtomicBool::new(false);

        thread::scope(|s| {
            let writer = locks.exclusive_lock(EntityType::Node, 6);
            let reader = s.spawn(|| {
                let _lock = locks.shared_lock(EntityType::Node, 6);
                acquired.store(true, Ordering::SeqCst);
            });

            thread::sleep(Duration::from_millis(50));
            assert!(!acquired.load(Ordering::SeqCst));
            drop(writer);
            reader.join().unwrap();
        });
        assert!(acquired.load(Ordering::SeqCst));
    }

    #[test]
    fn entity_types_use_separate_stripes() {
        let locks = StripedLockService::new(1);
        let _writer = locks.exclusive_lock(EntityType::Relationship, 0);
        let _reader = locks.shared_lock(EntityType::Node, 0);
    }
}
