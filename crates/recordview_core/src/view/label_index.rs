//! Label index and the store view that scans through it.

use super::{IndexStoreView, RecordIndexStoreView};
use crate::counts::DoubleLong;
use crate::entity::{EntityUpdates, NodeLabelUpdate, PropertyKeyFilter, PropertyLoadSink};
use crate::error::CoreResult;
use crate::scan::{BoxedVisitor, EntityIds, StoreScan};
use crate::types::{EntityType, IndexId, PropertyKeyId, TokenId};
use parking_lot::RwLock;
use recordview_codec::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Lists the nodes carrying given labels.
pub trait LabelScanReader: Send + Sync {
    /// Ids of nodes with any of `labels`, ascending and without duplicates.
    fn nodes_with_any_label(&self, labels: &[TokenId]) -> Vec<u64>;
}

/// A label index held in memory.
#[derive(Debug, Default)]
pub struct InMemoryLabelIndex {
    nodes_by_label: RwLock<BTreeMap<TokenId, BTreeSet<u64>>>,
}

impl InMemoryLabelIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a label change of one node.
    pub fn apply(&self, update: &NodeLabelUpdate) {
        let mut index = self.nodes_by_label.write();
        for label in update.removed_labels() {
            if let Some(nodes) = index.get_mut(&label) {
                nodes.remove(&update.node_id());
                if nodes.is_empty() {
                    index.remove(&label);
                }
            }
        }
        for label in update.added_labels() {
            index.entry(label).or_default().insert(update.node_id());
        }
    }

    /// Rebuilds the index from a full node scan of `view`.
    ///
    /// Returns the number of nodes seen.
    ///
    /// # Errors
    ///
    /// Propagates scan errors; the index keeps whatever was applied.
    pub fn populate(&self, view: &dyn IndexStoreView) -> CoreResult<u64> {
        self.nodes_by_label.write().clear();
        let mut seen = 0u64;
        let mut scan = view.visit_nodes(
            &[],
            PropertyKeyFilter::All,
            None,
            Some(Box::new(|update: NodeLabelUpdate| -> CoreResult<bool> {
                self.apply(&update);
                seen += 1;
                Ok(false)
            })),
            true,
        );
        scan.run()?;
        drop(scan);
        debug!(nodes = seen, labels = self.nodes_by_label.read().len(), "label index populated");
        Ok(seen)
    }

    /// Ids of nodes with `label`, ascending.
    #[must_use]
    pub fn nodes_with_label(&self, label: TokenId) -> Vec<u64> {
        self.nodes_by_label
            .read()
            .get(&label)
            .map(|nodes| nodes.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl LabelScanReader for InMemoryLabelIndex {
    fn nodes_with_any_label(&self, labels: &[TokenId]) -> Vec<u64> {
        let index = self.nodes_by_label.read();
        let nodes: BTreeSet<u64> = labels
            .iter()
            .filter_map(|label| index.get(label))
            .flatten()
            .copied()
            .collect();
        nodes.into_iter().collect()
    }
}

/// Store view that drives labelled node scans from a label index.
///
/// The index only narrows the ids visited; each candidate is read and
/// checked against the store like in a full scan, so a stale index entry
/// never produces an update the store does not back.
#[derive(Clone)]
pub struct LabelIndexedStoreView {
    records: RecordIndexStoreView,
    label_index: Arc<dyn LabelScanReader>,
}

impl LabelIndexedStoreView {
    /// Wraps a record view with a label index.
    #[must_use]
    pub fn new(records: RecordIndexStoreView, label_index: Arc<dyn LabelScanReader>) -> Self {
        Self {
            records,
            label_index,
        }
    }

    /// The record view used for everything but labelled node scans.
    #[must_use]
    pub fn records(&self) -> &RecordIndexStoreView {
        &self.records
    }
}

impl IndexStoreView for LabelIndexedStoreView {
    fn visit_nodes<'a>(
        &self,
        label_ids: &[TokenId],
        property_key_filter: PropertyKeyFilter,
        property_visitor: Option<BoxedVisitor<'a, EntityUpdates>>,
        label_visitor: Option<BoxedVisitor<'a, NodeLabelUpdate>>,
        force_store_scan: bool,
    ) -> Box<dyn StoreScan + 'a> {
        if force_store_scan || label_ids.is_empty() {
            return self.records.visit_nodes(
                label_ids,
                property_key_filter,
                property_visitor,
                label_visitor,
                force_store_scan,
            );
        }

        let candidates = self.label_index.nodes_with_any_label(label_ids);
        debug!(labels = ?label_ids, candidates = candidates.len(), "label index scan");
        Box::new(self.records.node_scan(
            EntityIds::Candidates(candidates),
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
        self.records
            .visit_relationships(relationship_type_ids, property_key_filter, property_visitor)
    }

    fn node_as_updates(&self, node_id: u64) -> CoreResult<Option<EntityUpdates>> {
        self.records.node_as_updates(node_id)
    }

    fn node_property_value(&self, node_id: u64, key: PropertyKeyId) -> CoreResult<Option<Value>> {
        self.records.node_property_value(node_id, key)
    }

    fn load_properties(
        &self,
        entity_id: u64,
        entity_type: EntityType,
        keys: &mut HashSet<PropertyKeyId>,
        sink: &mut dyn PropertyLoadSink,
    ) -> CoreResult<()> {
        self.records.load_properties(entity_id, entity_type, keys, sink)
    }

    fn index_updates_and_size(&self, index: IndexId) -> DoubleLong {
        self.records.index_updates_and_size(index)
    }

    fn index_sample(&self, index: IndexId) -> DoubleLong {
        self.records.index_sample(index)
    }

    fn replace_index_counts(
        &self,
        index: IndexId,
        unique_elements: u64,
        max_unique_elements: u64,
        index_size: u64,
    ) {
        self.records
            .replace_index_counts(index, unique_elements, max_unique_elements, index_size);
    }

    fn increment_index_updates(&self, index: IndexId, delta: i64) {
        self.records.increment_index_updates(index, delta);
    }
}

impl std::fmt::Debug for LabelIndexedStoreView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelIndexedStoreView")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}
