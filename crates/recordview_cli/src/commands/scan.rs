//! Scan command implementation.

use clap::ValueEnum;
use recordview_core::{
    BoxedVisitor, CoreError, CoreResult, EntityType, EntityUpdates, InMemoryCountsStore,
    InMemoryLabelIndex, IndexStoreView, LabelIndexedStoreView, NoLockService, PropertyKeyFilter,
    RecordIndexStoreView, StoreScan, TokenId,
};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Entity store to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanEntity {
    /// Scan the node store.
    Nodes,
    /// Scan the relationship store.
    Relationships,
}

impl ScanEntity {
    fn entity_type(self) -> EntityType {
        match self {
            Self::Nodes => EntityType::Node,
            Self::Relationships => EntityType::Relationship,
        }
    }
}

/// Options of one scan run.
#[derive(Debug)]
pub struct ScanOptions {
    /// Store to scan.
    pub entity: ScanEntity,
    /// Labels or relationship types to match.
    pub tokens: Vec<TokenId>,
    /// Property keys to include.
    pub keys: Vec<u32>,
    /// Use a label index for labelled node scans.
    pub label_index: bool,
    /// Stop after this many updates.
    pub limit: Option<u64>,
    /// Output format (text, json).
    pub format: String,
}

/// Runs the scan command.
pub fn run(path: &Path, options: &ScanOptions) -> Result<(), Box<dyn std::error::Error>> {
    let stores = Arc::new(super::open_stores(path)?);
    let records = RecordIndexStoreView::new(
        stores,
        Arc::new(NoLockService),
        Arc::new(InMemoryCountsStore::new()),
    );

    let printed = if options.label_index && options.entity == ScanEntity::Nodes {
        let index = Arc::new(InMemoryLabelIndex::new());
        let indexed = index.populate(&records)?;
        info!(nodes = indexed, "label index populated");
        let view = LabelIndexedStoreView::new(records.clone(), index);
        scan(&view, options)?
    } else {
        scan(&records, options)?
    };

    let stats = records.stats().snapshot();
    info!(
        printed,
        read = stats.entities_read,
        skipped = stats.entities_skipped,
        sparse = stats.sparse_skipped,
        "scan finished"
    );
    if options.format != "json" {
        println!();
        println!(
            "{} updates, {} records read, {} sparse",
            printed, stats.entities_read, stats.sparse_skipped
        );
    }
    Ok(())
}

fn scan(view: &dyn IndexStoreView, options: &ScanOptions) -> CoreResult<u64> {
    let filter = if options.keys.is_empty() {
        PropertyKeyFilter::All
    } else {
        PropertyKeyFilter::keys(options.keys.iter().copied())
    };
    let entity_type = options.entity.entity_type();
    let json = options.format == "json";
    let limit = options.limit;
    let mut printed = 0u64;

    let visitor: BoxedVisitor<'_, EntityUpdates> = Box::new(|update: EntityUpdates| -> CoreResult<bool> {
        if json {
            match serde_json::to_string(&update) {
                Ok(line) => println!("{line}"),
                Err(e) => return Err(CoreError::invalid_operation(e.to_string())),
            }
        } else {
            println!("{}", format_update(entity_type, &update));
        }
        printed += 1;
        Ok(limit.is_some_and(|limit| printed >= limit))
    });

    let mut scan: Box<dyn StoreScan + '_> = match options.entity {
        ScanEntity::Nodes => view.visit_nodes(&options.tokens, filter, Some(visitor), None, false),
        ScanEntity::Relationships => view.visit_relationships(&options.tokens, filter, visitor),
    };
    scan.run()?;
    drop(scan);
    Ok(printed)
}

/// One-line text rendering of an update.
pub fn format_update(entity_type: EntityType, update: &EntityUpdates) -> String {
    let mut line = format!("{} {} {:?} {{", entity_type, update.entity_id(), update.tokens());
    for (i, (key, value)) in update.properties().iter().enumerate() {
        if i > 0 {
            line.push_str(", ");
        }
        let _ = write!(line, "{key}: {value}");
    }
    line.push('}');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordview_core::Value;

    #[test]
    fn text_rendering() {
        let mut builder = EntityUpdates::for_entity(4).with_tokens(vec![7, 3]);
        builder.added(2, Value::Long(42)).added(1, Value::from("a"));
        let line = format_update(EntityType::Node, &builder.build());
        assert_eq!(line, "node 4 [3, 7] {1: \"a\", 2: 42}");
    }

    #[test]
    fn entity_mapping() {
        assert_eq!(ScanEntity::Nodes.entity_type(), EntityType::Node);
        assert_eq!(
            ScanEntity::Relationships.entity_type(),
            EntityType::Relationship
        );
    }
}
