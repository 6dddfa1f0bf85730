//! Node store scans.

use super::{BoxedVisitor, EntityIds, ScanDriver, ScanProgressHandle, ScanStopHandle, StoreScan};
use crate::entity::{EntityUpdates, NodeLabelUpdate, PropertyKeyFilter};
use crate::error::CoreResult;
use crate::labels::contains_any_token;
use crate::record::{NodeRecord, PrimitiveRecord, Record};
use crate::store::RecordLoad;
use crate::types::TokenId;
use std::sync::Arc;
use tracing::trace;

/// Scan over node records.
///
/// For every in-use node the label visitor (if any) receives the node's
/// labels. The property visitor (if any) receives an [`EntityUpdates`] for
/// nodes that carry one of the requested labels (any label when none are
/// requested) and at least one property accepted by the key filter.
pub struct NodeStoreScan<'a> {
    driver: ScanDriver,
    label_ids: Vec<TokenId>,
    filter: PropertyKeyFilter,
    property_visitor: Option<BoxedVisitor<'a, EntityUpdates>>,
    label_visitor: Option<BoxedVisitor<'a, NodeLabelUpdate>>,
    node: NodeRecord,
}

impl<'a> NodeStoreScan<'a> {
    pub(crate) fn new(
        driver: ScanDriver,
        label_ids: &[TokenId],
        filter: PropertyKeyFilter,
        property_visitor: Option<BoxedVisitor<'a, EntityUpdates>>,
        label_visitor: Option<BoxedVisitor<'a, NodeLabelUpdate>>,
    ) -> Self {
        Self {
            driver,
            label_ids: label_ids.to_vec(),
            filter,
            property_visitor,
            label_visitor,
            node: NodeRecord::default(),
        }
    }

    /// Whether this scan visits only label index candidates.
    #[must_use]
    pub fn is_index_driven(&self) -> bool {
        matches!(self.driver.ids(), EntityIds::Candidates(_))
    }
}

impl StoreScan for NodeStoreScan<'_> {
    fn run(&mut self) -> CoreResult<()> {
        let Self {
            driver,
            label_ids,
            filter,
            property_visitor,
            label_visitor,
            node,
        } = self;
        let stats = Arc::clone(driver.stats());

        driver.run(|reader, id| {
            reader
                .stores()
                .nodes()
                .get_record(id, node, RecordLoad::Force)?;
            stats.record_entity_read();
            if !node.in_use() {
                stats.record_entity_skipped();
                trace!(id, "node not in use");
                return Ok(false);
            }

            let labels = reader.node_labels(node)?;
            let mut stop = false;
            if let Some(visitor) = label_visitor.as_mut() {
                stats.record_label_update();
                stop |= visitor.visit(NodeLabelUpdate::scanned(id, labels.clone()))?;
            }

            if let Some(visitor) = property_visitor.as_mut() {
                if contains_any_token(label_ids, &labels) {
                    let mut builder = EntityUpdates::for_entity(id).with_tokens(labels);
                    if reader.add_properties(node.next_prop(), filter, &mut builder)? {
                        stats.record_entity_update();
                        stop |= visitor.visit(builder.build())?;
                        return Ok(stop);
                    }
                }
                stats.record_sparse_skip();
                trace!(id, "node has no matching labels or properties");
            }
            Ok(stop)
        })
    }

    fn stop_handle(&self) -> ScanStopHandle {
        self.driver.stop_handle()
    }

    fn progress_handle(&self) -> ScanProgressHandle {
        self.driver.progress_handle()
    }
}
