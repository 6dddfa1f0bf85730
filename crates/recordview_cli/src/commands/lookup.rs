//! Lookup command implementation.

use recordview_core::{
    CoreResult, EntityType, IndexStoreView, InMemoryCountsStore, NoLockService, PropertyKeyId,
    RecordIndexStoreView, Value,
};
use std::path::Path;
use std::sync::Arc;

/// Entity a lookup reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A node id.
    Node(u64),
    /// A relationship id.
    Relationship(u64),
}

impl Target {
    fn entity_type(self) -> EntityType {
        match self {
            Self::Node(_) => EntityType::Node,
            Self::Relationship(_) => EntityType::Relationship,
        }
    }

    fn id(self) -> u64 {
        match self {
            Self::Node(id) | Self::Relationship(id) => id,
        }
    }
}

/// Runs the lookup command.
pub fn run(path: &Path, target: Target, key: PropertyKeyId) -> Result<(), Box<dyn std::error::Error>> {
    let stores = Arc::new(super::open_stores(path)?);
    let view = RecordIndexStoreView::new(
        stores,
        Arc::new(NoLockService),
        Arc::new(InMemoryCountsStore::new()),
    );

    let value = lookup(&view, target, key)?;
    println!("{}", describe(target, key, value.as_ref()));
    Ok(())
}

fn lookup(
    view: &RecordIndexStoreView,
    target: Target,
    key: PropertyKeyId,
) -> CoreResult<Option<Value>> {
    match target {
        Target::Node(id) => view.node_property_value(id, key),
        Target::Relationship(id) => view.relationship_property_value(id, key),
    }
}

fn describe(target: Target, key: PropertyKeyId, value: Option<&Value>) -> String {
    let entity = format!("{} {}", target.entity_type(), target.id());
    match value {
        Some(value) => format!("{entity} property {key} = {value}"),
        None => format!("{entity} has no property {key}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordview_core::{Config, NodeRecord, PropertyBlock, PropertyRecord, Stores};

    fn view() -> RecordIndexStoreView {
        let stores = Stores::in_memory(Config::default()).unwrap();
        let mut property = PropertyRecord::new(0);
        property
            .add_block(PropertyBlock::inline(1, &Value::Int(5)).unwrap())
            .unwrap();
        stores.properties().write_record(&property).unwrap();
        stores
            .nodes()
            .write_record(&NodeRecord::new(0).with_next_prop(Some(0)))
            .unwrap();
        RecordIndexStoreView::new(
            Arc::new(stores),
            Arc::new(NoLockService),
            Arc::new(InMemoryCountsStore::new()),
        )
    }

    #[test]
    fn finds_value() {
        let view = view();
        let value = lookup(&view, Target::Node(0), 1).unwrap();
        assert_eq!(value, Some(Value::Int(5)));
        assert_eq!(
            describe(Target::Node(0), 1, value.as_ref()),
            "node 0 property 1 = 5"
        );
    }

    #[test]
    fn missing_key_and_missing_entity() {
        let view = view();
        assert_eq!(lookup(&view, Target::Node(0), 2).unwrap(), None);
        assert_eq!(
            describe(Target::Relationship(3), 2, None),
            "relationship 3 has no property 2"
        );
        assert!(lookup(&view, Target::Node(8), 1).unwrap_err().is_not_found());
    }
}
