//! Store view backed directly by the record stores.

use super::IndexStoreView;
use crate::counts::{CountsStore, DoubleLong};
use crate::entity::{EntityReader, EntityUpdates, NodeLabelUpdate, PropertyKeyFilter, PropertyLoadSink};
use crate::error::CoreResult;
use crate::locks::LockService;
use crate::scan::{BoxedVisitor, EntityIds, NodeStoreScan, RelationshipStoreScan, ScanDriver, StoreScan};
use crate::stats::ScanStats;
use crate::store::Stores;
use crate::types::{EntityType, IndexId, PropertyKeyId, TokenId};
use recordview_codec::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Store view whose scans read every record of the entity store.
#[derive(Clone)]
pub struct RecordIndexStoreView {
    stores: Arc<Stores>,
    locks: Arc<dyn LockService>,
    counts: Arc<dyn CountsStore>,
    stats: Arc<ScanStats>,
}

impl RecordIndexStoreView {
    /// Creates a view over `stores`.
    #[must_use]
    pub fn new(
        stores: Arc<Stores>,
        locks: Arc<dyn LockService>,
        counts: Arc<dyn CountsStore>,
    ) -> Self {
        Self {
            stores,
            locks,
            counts,
            stats: Arc::new(ScanStats::new()),
        }
    }

    /// The stores this view reads.
    #[must_use]
    pub fn stores(&self) -> &Arc<Stores> {
        &self.stores
    }

    /// Statistics of this view and its scans.
    #[must_use]
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Update of one relationship with all its properties.
    ///
    /// # Errors
    ///
    /// Fails for damaged records, chains and payloads.
    pub fn relationship_as_updates(&self, relationship_id: u64) -> CoreResult<Option<EntityUpdates>> {
        self.stats.record_lookup();
        self.counted(
            self.reader()
                .as_updates(EntityType::Relationship, relationship_id),
        )
    }

    /// Value of one relationship property.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::EntityNotFound`](crate::CoreError::EntityNotFound)
    /// for a relationship that is not in use, and for damaged store contents.
    pub fn relationship_property_value(
        &self,
        relationship_id: u64,
        key: PropertyKeyId,
    ) -> CoreResult<Option<Value>> {
        self.stats.record_lookup();
        self.counted(
            self.reader()
                .property_value(EntityType::Relationship, relationship_id, key),
        )
    }

    pub(crate) fn node_scan<'a>(
        &self,
        ids: EntityIds,
        label_ids: &[TokenId],
        property_key_filter: PropertyKeyFilter,
        property_visitor: Option<BoxedVisitor<'a, EntityUpdates>>,
        label_visitor: Option<BoxedVisitor<'a, NodeLabelUpdate>>,
    ) -> NodeStoreScan<'a> {
        NodeStoreScan::new(
            self.driver(EntityType::Node, ids),
            label_ids,
            property_key_filter,
            property_visitor,
            label_visitor,
        )
    }

    fn driver(&self, entity_type: EntityType, ids: EntityIds) -> ScanDriver {
        ScanDriver::new(
            entity_type,
            Arc::clone(&self.stores),
            Arc::clone(&self.locks),
            Arc::clone(&self.stats),
            ids,
        )
    }

    fn reader(&self) -> EntityReader<'_> {
        EntityReader::new(&self.stores)
    }

    fn counted<T>(&self, result: CoreResult<T>) -> CoreResult<T> {
        if let Err(e) = &result {
            if e.is_corruption() {
                self.stats.record_corruption();
            }
        }
        result
    }
}

impl IndexStoreView for RecordIndexStoreView {
    fn visit_nodes<'a>(
        &self,
        label_ids: &[TokenId],
        property_key_filter: PropertyKeyFilter,
        property_visitor: Option<BoxedVisitor<'a, EntityUpdates>>,
        label_visitor: Option<BoxedVisitor<'a, NodeLabelUpdate>>,
        _force_store_scan: bool,
    ) -> Box<dyn StoreScan + 'a> {
        Box::new(self.node_scan(
            EntityIds::AllRecords,
            label_ids,
            property_key_filter,
            property_visitor,
            label_visitor,
        ))
    }

    fn visit_relationships<'a>(
        &self,
        relationship_type_ids: &[TokenId],
        property_key_filter: PropertyKeyFilter,
        property_visitor: BoxedVisitor<'a, EntityUpdates>,
    ) -> Box<dyn StoreScan + 'a> {
        Box::new(RelationshipStoreScan::new(
            self.driver(EntityType::Relationship, EntityIds::AllRecords),
            relationship_type_ids,
            property_key_filter,
            property_visitor,
        ))
    }

    fn node_as_updates(&self, node_id: u64) -> CoreResult<Option<EntityUpdates>> {
        self.stats.record_lookup();
        self.counted(self.reader().as_updates(EntityType::Node, node_id))
    }

    fn node_property_value(&self, node_id: u64, key: PropertyKeyId) -> CoreResult<Option<Value>> {
        self.stats.record_lookup();
        self.counted(self.reader().property_value(EntityType::Node, node_id, key))
    }

    fn load_properties(
        &self,
        entity_id: u64,
        entity_type: EntityType,
        keys: &mut HashSet<PropertyKeyId>,
        sink: &mut dyn PropertyLoadSink,
    ) -> CoreResult<()> {
        self.stats.record_lookup();
        self.counted(self.reader().load_properties(entity_type, entity_id, keys, sink))
    }

    fn index_updates_and_size(&self, index: IndexId) -> DoubleLong {
        self.counts.index_updates_and_size(index)
    }

    fn index_sample(&self, index: IndexId) -> DoubleLong {
        self.counts.index_sample(index)
    }

    fn replace_index_counts(
        &self,
        index: IndexId,
        unique_elements: u64,
        max_unique_elements: u64,
        index_size: u64,
    ) {
        self.counts
            .replace_index_sample(index, unique_elements, max_unique_elements);
        self.counts.replace_index_updates_and_size(index, 0, index_size);
    }

    fn increment_index_updates(&self, index: IndexId, delta: i64) {
        self.counts.increment_index_updates(index, delta);
    }
}

impl std::fmt::Debug for RecordIndexStoreView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordIndexStoreView")
            .field("stores", &self.stores)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
