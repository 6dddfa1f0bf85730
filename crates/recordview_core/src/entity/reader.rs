//! Reading entities and their properties from the stores.

use super::{EntityUpdates, EntityUpdatesBuilder, PropertyKeyFilter};
use crate::error::{CoreError, CoreResult};
use crate::record::{NodeRecord, PrimitiveRecord, Record, RelationshipRecord};
use crate::store::{RecordLoad, Stores};
use crate::types::{EntityType, PropertyKeyId, TokenId};
use recordview_codec::Value;
use std::collections::HashSet;
use tracing::trace;

/// Receives the properties found by a selective load.
pub trait PropertyLoadSink {
    /// Called once per requested key that was found.
    fn on_property(&mut self, key: PropertyKeyId, value: Value);
}

impl<F: FnMut(PropertyKeyId, Value)> PropertyLoadSink for F {
    fn on_property(&mut self, key: PropertyKeyId, value: Value) {
        self(key, value);
    }
}

/// Reads entity records together with their tokens and property chains.
///
/// Every method reads the stores afresh; nothing is cached between calls.
#[derive(Debug, Clone, Copy)]
pub struct EntityReader<'a> {
    stores: &'a Stores,
}

/// Head of an in-use entity: first property record and tokens.
struct EntityHead {
    next_prop: Option<u64>,
    tokens: Vec<TokenId>,
}

impl<'a> EntityReader<'a> {
    /// Creates a reader over `stores`.
    #[must_use]
    pub fn new(stores: &'a Stores) -> Self {
        Self { stores }
    }

    /// The stores this reader reads from.
    #[must_use]
    pub fn stores(&self) -> &'a Stores {
        self.stores
    }

    /// Decodes the labels of a node record.
    ///
    /// # Errors
    ///
    /// Fails for a damaged label chain.
    pub fn node_labels(&self, node: &NodeRecord) -> CoreResult<Vec<TokenId>> {
        node.labels().tokens(node.id(), self.stores.labels())
    }

    /// Builds the update of an entity with all of its properties.
    ///
    /// Returns `None` for an entity that is not in use, has no property
    /// chain or has no tokens. Tokens are only decoded once the entity is
    /// known to have properties.
    ///
    /// # Errors
    ///
    /// Fails for damaged records, chains and payloads.
    pub fn as_updates(&self, entity_type: EntityType, id: u64) -> CoreResult<Option<EntityUpdates>> {
        let Some(head) = self.entity_head(entity_type, id, true)? else {
            return Ok(None);
        };
        if head.next_prop.is_none() || head.tokens.is_empty() {
            trace!(%entity_type, id, "no properties or tokens");
            return Ok(None);
        }

        let mut builder = EntityUpdates::for_entity(id).with_tokens(head.tokens);
        self.add_properties(head.next_prop, &PropertyKeyFilter::All, &mut builder)?;
        Ok(Some(builder.build()))
    }

    /// Looks up one property of an entity.
    ///
    /// Returns the value of the first block with `key` in chain order, or
    /// `None` if the chain has no such block.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::EntityNotFound`] if the entity is not in
    /// use, and for damaged records, chains and payloads.
    pub fn property_value(
        &self,
        entity_type: EntityType,
        id: u64,
        key: PropertyKeyId,
    ) -> CoreResult<Option<Value>> {
        let head = self
            .entity_head(entity_type, id, false)?
            .ok_or(CoreError::EntityNotFound { entity_type, id })?;

        for record in self.stores.property_chain(head.next_prop) {
            if let Some(block) = record?.block(key) {
                return block.value(self.stores).map(Some);
            }
        }
        Ok(None)
    }

    /// Loads the properties of an entity whose keys are in `keys`.
    ///
    /// Each found key is removed from `keys` and passed to `sink` with its
    /// value, in chain order. The walk ends once `keys` is empty. An entity
    /// that is not in use or has no properties leaves `keys` untouched.
    ///
    /// # Errors
    ///
    /// Fails for damaged records, chains and payloads.
    pub fn load_properties(
        &self,
        entity_type: EntityType,
        id: u64,
        keys: &mut HashSet<PropertyKeyId>,
        sink: &mut dyn PropertyLoadSink,
    ) -> CoreResult<()> {
        let Some(head) = self.entity_head(entity_type, id, false)? else {
            return Ok(());
        };

        for record in self.stores.property_chain(head.next_prop) {
            if keys.is_empty() {
                break;
            }
            let record = record?;
            for block in record.blocks() {
                if keys.remove(&block.key()) {
                    sink.on_property(block.key(), block.value(self.stores)?);
                }
            }
        }
        Ok(())
    }

    /// Adds the properties accepted by `filter` to `builder`.
    ///
    /// Returns whether any property was accepted.
    ///
    /// # Errors
    ///
    /// Fails for damaged chains and payloads.
    pub fn add_properties(
        &self,
        head: Option<u64>,
        filter: &PropertyKeyFilter,
        builder: &mut EntityUpdatesBuilder,
    ) -> CoreResult<bool> {
        let mut found = false;
        for record in self.stores.property_chain(head) {
            for block in record?.blocks() {
                if filter.accepts(block.key()) {
                    builder.added(block.key(), block.value(self.stores)?);
                    found = true;
                }
            }
        }
        Ok(found)
    }

    /// Reads an entity record; `None` if it is not in use.
    ///
    /// Node labels are decoded only when `with_tokens` is set and the node
    /// has a property chain.
    fn entity_head(
        &self,
        entity_type: EntityType,
        id: u64,
        with_tokens: bool,
    ) -> CoreResult<Option<EntityHead>> {
        match entity_type {
            EntityType::Node => {
                let mut node = self.stores.nodes().new_record();
                self.stores.nodes().get_record(id, &mut node, RecordLoad::Force)?;
                if !node.in_use() {
                    return Ok(None);
                }
                let tokens = if with_tokens && node.next_prop().is_some() {
                    self.node_labels(&node)?
                } else {
                    Vec::new()
                };
                Ok(Some(EntityHead {
                    next_prop: node.next_prop(),
                    tokens,
                }))
            }
            EntityType::Relationship => {
                let mut rel: RelationshipRecord = self.stores.relationships().new_record();
                self.stores
                    .relationships()
                    .get_record(id, &mut rel, RecordLoad::Force)?;
                if !rel.in_use() {
                    return Ok(None);
                }
                Ok(Some(EntityHead {
                    next_prop: rel.next_prop(),
                    tokens: vec![rel.rel_type()],
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::labels::LabelsField;
    use crate::record::{PropertyBlock, PropertyRecord};
    use recordview_codec::{encode_dynamic, PropertyType};

    /// Node 0: labels {3, 7}, properties {1: "a", 2: 42} over two records.
    /// Node 1: not in use. Node 2: labels {3}, no properties.
    /// Node 3: properties {1: true}, no labels.
    /// Relationship 0: type 5, property {4: 1.5}.
    fn fixture() -> Stores {
        let stores = Stores::in_memory(Config::default()).unwrap();

        let head = stores
            .strings()
            .write_chain(&encode_dynamic(&Value::from("a")).unwrap())
            .unwrap();
        let mut first = PropertyRecord::new(0).with_next_prop(Some(1));
        first
            .add_block(PropertyBlock::pointer(1, PropertyType::String, head).unwrap())
            .unwrap();
        let mut second = PropertyRecord::new(1);
        second.add_block(PropertyBlock::inline(2, &Value::Int(42)).unwrap()).unwrap();
        let mut third = PropertyRecord::new(2);
        third.add_block(PropertyBlock::inline(1, &Value::Bool(true)).unwrap()).unwrap();
        let mut fourth = PropertyRecord::new(3);
        fourth.add_block(PropertyBlock::inline(4, &Value::Double(1.5)).unwrap()).unwrap();
        for record in [first, second, third, fourth] {
            stores.properties().write_record(&record).unwrap();
        }

        let labels = LabelsField::inline(&[7, 3]).unwrap();
        let nodes = stores.nodes();
        nodes.write_record(&NodeRecord::new(0).with_next_prop(Some(0)).with_labels(labels)).unwrap();
        let mut deleted = NodeRecord::new(1).with_next_prop(Some(0)).with_labels(labels);
        deleted.set_in_use(false);
        nodes.write_record(&deleted).unwrap();
        nodes
            .write_record(&NodeRecord::new(2).with_labels(LabelsField::inline(&[3]).unwrap()))
            .unwrap();
        nodes.write_record(&NodeRecord::new(3).with_next_prop(Some(2))).unwrap();

        stores
            .relationships()
            .write_record(&RelationshipRecord::new(0, 0, 2, 5).with_next_prop(Some(3)))
            .unwrap();
        stores
    }

    #[test]
    fn node_update_spans_records() {
        let stores = fixture();
        let reader = EntityReader::new(&stores);
        let updates = reader.as_updates(EntityType::Node, 0).unwrap().unwrap();

        let mut expected = EntityUpdates::for_entity(0).with_tokens(vec![3, 7]);
        expected.added(1, Value::from("a")).added(2, Value::Int(42));
        assert_eq!(updates, expected.build());
    }

    #[test]
    fn sparse_nodes_have_no_update() {
        let stores = fixture();
        let reader = EntityReader::new(&stores);
        assert_eq!(reader.as_updates(EntityType::Node, 1).unwrap(), None);
        assert_eq!(reader.as_updates(EntityType::Node, 2).unwrap(), None);
        assert_eq!(reader.as_updates(EntityType::Node, 3).unwrap(), None);
        assert_eq!(reader.as_updates(EntityType::Node, 500).unwrap(), None);
    }

    #[test]
    fn relationship_update_uses_type_token() {
        let stores = fixture();
        let updates = EntityReader::new(&stores)
            .as_updates(EntityType::Relationship, 0)
            .unwrap()
            .unwrap();
        assert_eq!(updates.tokens(), &[5]);
        assert_eq!(updates.property(4), Some(&Value::Double(1.5)));
    }

    #[test]
    fn property_lookup() {
        let stores = fixture();
        let reader = EntityReader::new(&stores);
        assert_eq!(
            reader.property_value(EntityType::Node, 0, 2).unwrap(),
            Some(Value::Int(42))
        );
        assert_eq!(reader.property_value(EntityType::Node, 0, 9).unwrap(), None);
        assert_eq!(reader.property_value(EntityType::Node, 2, 1).unwrap(), None);

        let err = reader.property_value(EntityType::Node, 1, 1).unwrap_err();
        assert!(matches!(
            err,
            CoreError::EntityNotFound {
                entity_type: EntityType::Node,
                id: 1
            }
        ));
    }

    #[test]
    fn selective_load() {
        let stores = fixture();
        let reader = EntityReader::new(&stores);
        let mut keys = HashSet::from([1, 2, 5]);
        let mut found = Vec::new();
        reader
            .load_properties(EntityType::Node, 0, &mut keys, &mut |key: u32, value: Value| {
                found.push((key, value));
            })
            .unwrap();

        assert_eq!(found, vec![(1, Value::from("a")), (2, Value::Int(42))]);
        assert_eq!(keys, HashSet::from([5]));
    }

    #[test]
    fn selective_load_of_deleted_entity() {
        let stores = fixture();
        let mut keys = HashSet::from([1]);
        let mut calls = 0;
        EntityReader::new(&stores)
            .load_properties(EntityType::Node, 1, &mut keys, &mut |_: u32, _: Value| calls += 1)
            .unwrap();
        assert_eq!(calls, 0);
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn filtered_properties() {
        let stores = fixture();
        let reader = EntityReader::new(&stores);
        let mut builder = EntityUpdates::for_entity(0);
        assert!(reader
            .add_properties(Some(0), &PropertyKeyFilter::keys([2]), &mut builder)
            .unwrap());
        let updates = builder.build();
        assert_eq!(updates.properties().len(), 1);
        assert_eq!(updates.property(2), Some(&Value::Int(42)));

        let mut builder = EntityUpdates::for_entity(0);
        assert!(!reader
            .add_properties(Some(0), &PropertyKeyFilter::keys([8]), &mut builder)
            .unwrap());
    }
}
