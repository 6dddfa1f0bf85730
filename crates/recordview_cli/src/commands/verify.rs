//! Verify command implementation.

use recordview_core::{
    CoreResult, EntityType, NodeRecord, PrimitiveRecord, Record, RecordLoad, RecordStore,
    RelationshipRecord, Stores,
};
use std::path::Path;
use tracing::{debug, warn};

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of records checked.
    pub records_checked: u64,
    /// Number of valid records.
    pub valid_records: u64,
    /// Number of corrupt records.
    pub corrupt_records: u64,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn new() -> Self {
        Self {
            records_checked: 0,
            valid_records: 0,
            corrupt_records: 0,
            errors: Vec::new(),
        }
    }

    fn is_ok(&self) -> bool {
        self.corrupt_records == 0 && self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(path: &Path, max_errors: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying stores at {:?}", path);
    println!();

    let stores = super::open_stores(path)?;

    println!("Checking nodes...");
    let node_result = verify_nodes(&stores, max_errors)?;
    print_result("Nodes", &node_result);

    println!("Checking relationships...");
    let relationship_result = verify_relationships(&stores, max_errors)?;
    print_result("Relationships", &relationship_result);

    println!();
    if node_result.is_ok() && relationship_result.is_ok() {
        println!("✓ Store verification passed");
        Ok(())
    } else {
        println!("✗ Store verification failed");
        Err("Verification failed".into())
    }
}

/// Checks labels and properties of every in-use node.
pub fn verify_nodes(stores: &Stores, max_errors: usize) -> CoreResult<VerifyResult> {
    verify_store(stores, stores.nodes(), EntityType::Node, max_errors, |node: &NodeRecord| {
        node.labels().tokens(node.id(), stores.labels()).map(drop)
    })
}

/// Checks properties of every in-use relationship.
pub fn verify_relationships(stores: &Stores, max_errors: usize) -> CoreResult<VerifyResult> {
    verify_store(
        stores,
        stores.relationships(),
        EntityType::Relationship,
        max_errors,
        |_: &RelationshipRecord| Ok(()),
    )
}

// Storage errors abort; damaged entities are counted and listed.
fn verify_store<R: PrimitiveRecord>(
    stores: &Stores,
    store: &RecordStore<R>,
    entity_type: EntityType,
    max_errors: usize,
    check_tokens: impl Fn(&R) -> CoreResult<()>,
) -> CoreResult<VerifyResult> {
    let mut result = VerifyResult::new();
    let mut record = store.new_record();

    for id in 0..store.high_id()? {
        store.get_record(id, &mut record, RecordLoad::Force)?;
        if !record.in_use() {
            continue;
        }
        result.records_checked += 1;

        let outcome = check_tokens(&record).and_then(|()| check_properties(stores, &record));
        match outcome {
            Ok(()) => result.valid_records += 1,
            Err(e) if e.is_corruption() => {
                warn!(%entity_type, id, error = %e, "corrupt entity");
                result.corrupt_records += 1;
                if result.errors.len() < max_errors {
                    result.errors.push(format!("{entity_type} {id}: {e}"));
                }
            }
            Err(e) => return Err(e),
        }
    }

    debug!(%entity_type, checked = result.records_checked, "store verified");
    Ok(result)
}

fn check_properties<R: PrimitiveRecord>(stores: &Stores, record: &R) -> CoreResult<()> {
    for property in stores.property_chain(record.next_prop()) {
        for block in property?.blocks() {
            block.value(stores)?;
        }
    }
    Ok(())
}

fn print_result(name: &str, result: &VerifyResult) {
    println!(
        "  {} records checked: {}, valid: {}, corrupt: {}",
        name, result.records_checked, result.valid_records, result.corrupt_records
    );
    for error in &result.errors {
        println!("    ERROR: {}", error);
    }
}
