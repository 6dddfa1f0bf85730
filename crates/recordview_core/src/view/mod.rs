//! Index store views.
//!
//! An [`IndexStoreView`] is what index population reads the graph through:
//! full scans for building an index, single-entity updates and lookups for
//! keeping it current, and the index counters.
//!
//! Two backends exist:
//!
//! - [`RecordIndexStoreView`]: every scan walks the whole entity store
//! - [`LabelIndexedStoreView`]: node scans for specific labels visit only
//!   the nodes a label index lists, re-checking each against the store

mod label_index;
mod record;

pub use label_index::{InMemoryLabelIndex, LabelIndexedStoreView, LabelScanReader};
pub use record::RecordIndexStoreView;

use crate::counts::DoubleLong;
use crate::entity::{EntityUpdates, NodeLabelUpdate, PropertyKeyFilter, PropertyLoadSink};
use crate::error::CoreResult;
use crate::scan::{BoxedVisitor, StoreScan};
use crate::types::{EntityType, IndexId, PropertyKeyId, TokenId};
use recordview_codec::Value;
use std::collections::HashSet;

/// Read access to the stores for index population.
pub trait IndexStoreView: Send + Sync {
    /// Creates a scan over nodes.
    ///
    /// `label_visitor` sees the labels of every in-use node visited.
    /// `property_visitor` sees nodes with any of `label_ids` (any label if
    /// empty) and at least one property accepted by `property_key_filter`.
    /// `force_store_scan` disables any index-driven shortcut.
    fn visit_nodes<'a>(
        &self,
        label_ids: &[TokenId],
        property_key_filter: PropertyKeyFilter,
        property_visitor: Option<BoxedVisitor<'a, EntityUpdates>>,
        label_visitor: Option<BoxedVisitor<'a, NodeLabelUpdate>>,
        force_store_scan: bool,
    ) -> Box<dyn StoreScan + 'a>;

    /// Creates a scan over relationships of the given types (all if empty).
    fn visit_relationships<'a>(
        &self,
        relationship_type_ids: &[TokenId],
        property_key_filter: PropertyKeyFilter,
        property_visitor: BoxedVisitor<'a, EntityUpdates>,
    ) -> Box<dyn StoreScan + 'a>;

    /// Update of one node with all its properties.
    ///
    /// `None` for a node that is not in use, or has no properties or labels.
    ///
    /// # Errors
    ///
    /// Fails for damaged records, chains and payloads.
    fn node_as_updates(&self, node_id: u64) -> CoreResult<Option<EntityUpdates>>;

    /// Value of one node property.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::EntityNotFound`](crate::CoreError::EntityNotFound)
    /// for a node that is not in use, and for damaged store contents.
    fn node_property_value(&self, node_id: u64, key: PropertyKeyId) -> CoreResult<Option<Value>>;

    /// Loads the properties in `keys` of an entity into `sink`, removing
    /// each found key from `keys`.
    ///
    /// # Errors
    ///
    /// Fails for damaged records, chains and payloads.
    fn load_properties(
        &self,
        entity_id: u64,
        entity_type: EntityType,
        keys: &mut HashSet<PropertyKeyId>,
        sink: &mut dyn PropertyLoadSink,
    ) -> CoreResult<()>;

    /// `(updates, size)` counters of an index.
    fn index_updates_and_size(&self, index: IndexId) -> DoubleLong;

    /// `(unique values, sample size)` counters of an index.
    fn index_sample(&self, index: IndexId) -> DoubleLong;

    /// Stores a fresh sample and resets the update counter.
    fn replace_index_counts(
        &self,
        index: IndexId,
        unique_elements: u64,
        max_unique_elements: u64,
        index_size: u64,
    );

    /// Adds `delta` to the update counter of an index.
    fn increment_index_updates(&self, index: IndexId, delta: i64);
}
