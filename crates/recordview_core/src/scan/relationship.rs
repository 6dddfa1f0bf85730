//! Relationship store scans.

use super::{BoxedVisitor, ScanDriver, ScanProgressHandle, ScanStopHandle, StoreScan};
use crate::entity::{EntityUpdates, PropertyKeyFilter};
use crate::error::CoreResult;
use crate::labels::contains_any_token;
use crate::record::{PrimitiveRecord, Record, RelationshipRecord};
use crate::store::RecordLoad;
use crate::types::TokenId;
use std::sync::Arc;
use tracing::trace;

/// Scan over relationship records.
///
/// Relationships of a requested type (any type when none are requested)
/// with at least one property accepted by the key filter are passed to the
/// property visitor, with their type as the only token.
pub struct RelationshipStoreScan<'a> {
    driver: ScanDriver,
    type_ids: Vec<TokenId>,
    filter: PropertyKeyFilter,
    property_visitor: BoxedVisitor<'a, EntityUpdates>,
    relationship: RelationshipRecord,
}

impl<'a> RelationshipStoreScan<'a> {
    pub(crate) fn new(
        driver: ScanDriver,
        type_ids: &[TokenId],
        filter: PropertyKeyFilter,
        property_visitor: BoxedVisitor<'a, EntityUpdates>,
    ) -> Self {
        Self {
            driver,
            type_ids: type_ids.to_vec(),
            filter,
            property_visitor,
            relationship: RelationshipRecord::default(),
        }
    }
}

impl StoreScan for RelationshipStoreScan<'_> {
    fn run(&mut self) -> CoreResult<()> {
        let Self {
            driver,
            type_ids,
            filter,
            property_visitor,
            relationship,
        } = self;
        let stats = Arc::clone(driver.stats());

        driver.run(|reader, id| {
            reader
                .stores()
                .relationships()
                .get_record(id, relationship, RecordLoad::Force)?;
            stats.record_entity_read();
            if !relationship.in_use() {
                stats.record_entity_skipped();
                trace!(id, "relationship not in use");
                return Ok(false);
            }

            let tokens = vec![relationship.rel_type()];
            if contains_any_token(type_ids, &tokens) {
                let mut builder = EntityUpdates::for_entity(id).with_tokens(tokens);
                if reader.add_properties(relationship.next_prop(), filter, &mut builder)? {
                    stats.record_entity_update();
                    return property_visitor.visit(builder.build());
                }
            }
            stats.record_sparse_skip();
            Ok(false)
        })
    }

    fn stop_handle(&self) -> ScanStopHandle {
        self.driver.stop_handle()
    }

    fn progress_handle(&self) -> ScanProgressHandle {
        self.driver.progress_handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::locks::StripedLockService;
    use crate::record::{PropertyBlock, PropertyRecord};
    use crate::scan::EntityIds;
    use crate::stats::ScanStats;
    use crate::store::Stores;
    use crate::types::EntityType;
    use recordview_codec::Value;

    /// Relationships 0..4 of type `id % 2`, each with property {1: id};
    /// relationship 3 is not in use.
    fn stores() -> Arc<Stores> {
        let stores = Stores::in_memory(Config::default()).unwrap();
        for id in 0..4u64 {
            let mut prop = PropertyRecord::new(id);
            prop.add_block(PropertyBlock::inline(1, &Value::Int(id as i32)).unwrap())
                .unwrap();
            stores.properties().write_record(&prop).unwrap();

            let mut rel = RelationshipRecord::new(id, 0, 1, (id % 2) as u32).with_next_prop(Some(id));
            rel.set_in_use(id != 3);
            stores.relationships().write_record(&rel).unwrap();
        }
        Arc::new(stores)
    }

    fn run(type_ids: &[TokenId], filter: PropertyKeyFilter) -> (Vec<EntityUpdates>, Arc<ScanStats>) {
        let stores = stores();
        let stats = Arc::new(ScanStats::new());
        let driver = ScanDriver::new(
            EntityType::Relationship,
            stores,
            Arc::new(StripedLockService::default()),
            Arc::clone(&stats),
            EntityIds::AllRecords,
        );
        let mut seen = Vec::new();
        let mut scan = RelationshipStoreScan::new(
            driver,
            type_ids,
            filter,
            Box::new(|u: EntityUpdates| -> CoreResult<bool> {
                seen.push(u);
                Ok(false)
            }),
        );
        scan.run().unwrap();
        drop(scan);
        (seen, stats)
    }

    #[test]
    fn all_types() {
        let (seen, stats) = run(&[], PropertyKeyFilter::All);
        let ids: Vec<u64> = seen.iter().map(EntityUpdates::entity_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(seen[1].tokens(), &[1]);
        assert_eq!(seen[2].property(1), Some(&Value::Int(2)));
        assert_eq!(stats.entities_read(), 4);
        assert_eq!(stats.entities_skipped(), 1);
    }

    #[test]
    fn type_filter() {
        let (seen, stats) = run(&[1], PropertyKeyFilter::All);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].entity_id(), 1);
        assert_eq!(stats.sparse_skipped(), 2);
    }

    #[test]
    fn key_filter_without_match() {
        let (seen, _) = run(&[], PropertyKeyFilter::keys([7]));
        assert!(seen.is_empty());
    }
}
