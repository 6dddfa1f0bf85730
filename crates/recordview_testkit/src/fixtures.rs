//! Test fixtures and store helpers.
//!
//! [`TestStores`] owns a set of stores and writes entities into them the
//! way a writer would: property values are packed into chains of property
//! records, strings and arrays go to the dynamic stores and label sets that
//! do not fit the node record go to the label store.

use crate::generators::NodeSpec;
use recordview_codec::{encode_dynamic, encode_label_array};
use recordview_core::{
    Config, InMemoryCountsStore, LabelsField, LockService, NoLockService, NodeRecord,
    PropertyBlock, PropertyKeyId, PropertyRecord, PropertyType, Record, RecordIndexStoreView,
    RecordLoad, RelationshipRecord, Stores, TokenId, Value,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Stores with automatic cleanup.
pub struct TestStores {
    stores: Arc<Stores>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStores {
    /// Creates in-memory stores with the default configuration.
    pub fn memory() -> Self {
        Self::memory_with(Config::default())
    }

    /// Creates in-memory stores.
    pub fn memory_with(config: Config) -> Self {
        Self {
            stores: Arc::new(
                Stores::in_memory(config).expect("Failed to create in-memory stores"),
            ),
            _temp_dir: None,
        }
    }

    /// Creates file-backed stores in a temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let stores = Stores::open(temp_dir.path(), Config::default())
            .expect("Failed to open file stores");
        Self {
            stores: Arc::new(stores),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Returns the store directory if file-based, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self._temp_dir.as_ref().map(TempDir::path)
    }

    /// Shared handle to the stores.
    pub fn stores(&self) -> &Arc<Stores> {
        &self.stores
    }

    /// A view without locking and with fresh counters.
    pub fn view(&self) -> RecordIndexStoreView {
        self.view_with_locks(Arc::new(NoLockService))
    }

    /// A view taking entity locks from `locks`.
    pub fn view_with_locks(&self, locks: Arc<dyn LockService>) -> RecordIndexStoreView {
        RecordIndexStoreView::new(
            Arc::clone(&self.stores),
            locks,
            Arc::new(InMemoryCountsStore::new()),
        )
    }

    /// Writes an in-use node and returns its id.
    ///
    /// Properties are packed into as few property records as fit.
    pub fn node(&self, labels: &[TokenId], properties: &[(PropertyKeyId, Value)]) -> u64 {
        let head = self.write_properties(properties);
        self.node_with_head(labels, head)
    }

    /// Writes an in-use node whose chain has one property record per group.
    pub fn node_with_records(
        &self,
        labels: &[TokenId],
        records: &[&[(PropertyKeyId, Value)]],
    ) -> u64 {
        let head = self.write_property_records(records);
        self.node_with_head(labels, head)
    }

    /// Writes an in-use node pointing at an existing chain head.
    pub fn node_with_head(&self, labels: &[TokenId], head: Option<u64>) -> u64 {
        let nodes = self.stores.nodes();
        let id = nodes.allocate_id().expect("Failed to allocate node id");
        let node = NodeRecord::new(id)
            .with_labels(self.labels_field(labels))
            .with_next_prop(head);
        nodes.write_record(&node).expect("Failed to write node");
        id
    }

    /// Writes an in-use relationship and returns its id.
    pub fn relationship(
        &self,
        first_node: u64,
        second_node: u64,
        rel_type: TokenId,
        properties: &[(PropertyKeyId, Value)],
    ) -> u64 {
        let head = self.write_properties(properties);
        let relationships = self.stores.relationships();
        let id = relationships
            .allocate_id()
            .expect("Failed to allocate relationship id");
        let relationship =
            RelationshipRecord::new(id, first_node, second_node, rel_type).with_next_prop(head);
        relationships
            .write_record(&relationship)
            .expect("Failed to write relationship");
        id
    }

    /// Writes the nodes described by `specs`, in order.
    ///
    /// Node `i` of the specs gets id `i` on fresh stores.
    pub fn nodes_from_specs(&self, specs: &[NodeSpec]) -> Vec<u64> {
        specs
            .iter()
            .map(|spec| {
                let id = self.node(&spec.labels, &spec.properties);
                if !spec.in_use {
                    self.delete_node(id);
                }
                id
            })
            .collect()
    }

    /// Marks a node as not in use, keeping its fields.
    pub fn delete_node(&self, id: u64) {
        let nodes = self.stores.nodes();
        let mut node = nodes.new_record();
        nodes
            .get_record(id, &mut node, RecordLoad::Force)
            .expect("Failed to read node");
        node.set_in_use(false);
        nodes.write_record(&node).expect("Failed to delete node");
    }

    /// Marks a relationship as not in use, keeping its fields.
    pub fn delete_relationship(&self, id: u64) {
        let relationships = self.stores.relationships();
        let mut relationship = relationships.new_record();
        relationships
            .get_record(id, &mut relationship, RecordLoad::Force)
            .expect("Failed to read relationship");
        relationship.set_in_use(false);
        relationships
            .write_record(&relationship)
            .expect("Failed to delete relationship");
    }

    /// Rewrites the next pointer of a property record.
    ///
    /// Used to build damaged chains.
    pub fn link_property_record(&self, id: u64, next_prop: Option<u64>) {
        let properties = self.stores.properties();
        let mut record = properties.new_record();
        properties
            .get_record(id, &mut record, RecordLoad::Force)
            .expect("Failed to read property record");
        let mut relinked = PropertyRecord::new(id).with_next_prop(next_prop);
        for block in record.blocks() {
            relinked
                .add_block(*block)
                .expect("Failed to copy property block");
        }
        relinked.set_in_use(record.in_use());
        properties
            .write_record(&relinked)
            .expect("Failed to relink property record");
    }

    /// Writes a property chain packing blocks greedily; `None` if empty.
    pub fn write_properties(&self, properties: &[(PropertyKeyId, Value)]) -> Option<u64> {
        let mut groups: Vec<Vec<PropertyBlock>> = Vec::new();
        let mut free = 0;
        for (key, value) in properties {
            let block = self.block(*key, value);
            let slots = block.property_type().slot_count();
            if slots > free || groups.is_empty() {
                groups.push(Vec::new());
                free = recordview_core::PROPERTY_SLOTS;
            }
            free -= slots;
            if let Some(group) = groups.last_mut() {
                group.push(block);
            }
        }
        self.write_chain(groups)
    }

    /// Writes a property chain with one record per group; `None` if empty.
    pub fn write_property_records(&self, records: &[&[(PropertyKeyId, Value)]]) -> Option<u64> {
        let groups = records
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|(key, value)| self.block(*key, value))
                    .collect()
            })
            .collect();
        self.write_chain(groups)
    }

    /// Raw labels field for `labels`, spilling to the label store if needed.
    pub fn labels_field(&self, labels: &[TokenId]) -> u64 {
        if let Some(raw) = LabelsField::inline(labels) {
            return raw;
        }
        let mut sorted = labels.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let head = self
            .stores
            .labels()
            .write_chain(&encode_label_array(&sorted))
            .expect("Failed to write label chain");
        LabelsField::dynamic(head)
    }

    fn block(&self, key: PropertyKeyId, value: &Value) -> PropertyBlock {
        let ty = PropertyType::of(value);
        if ty.is_inline() {
            return PropertyBlock::inline(key, value).expect("Failed to encode inline value");
        }
        let payload = encode_dynamic(value).expect("Failed to encode dynamic value");
        let store = match ty {
            PropertyType::String => self.stores.strings(),
            _ => self.stores.arrays(),
        };
        let head = store
            .write_chain(&payload)
            .expect("Failed to write dynamic chain");
        PropertyBlock::pointer(key, ty, head).expect("Failed to encode pointer block")
    }

    fn write_chain(&self, groups: Vec<Vec<PropertyBlock>>) -> Option<u64> {
        let properties = self.stores.properties();
        let ids: Vec<u64> = groups
            .iter()
            .map(|_| {
                properties
                    .allocate_id()
                    .expect("Failed to allocate property id")
            })
            .collect();

        for (i, blocks) in groups.into_iter().enumerate() {
            let mut record = PropertyRecord::new(ids[i]).with_next_prop(ids.get(i + 1).copied());
            for block in blocks {
                record.add_block(block).expect("Property group overflows a record");
            }
            properties
                .write_record(&record)
                .expect("Failed to write property record");
        }
        ids.first().copied()
    }
}

impl std::ops::Deref for TestStores {
    type Target = Stores;

    fn deref(&self) -> &Self::Target {
        &self.stores
    }
}

/// Runs a test with temporary in-memory stores.
///
/// # Example
///
/// ```rust
/// use recordview_testkit::with_temp_stores;
///
/// with_temp_stores(|stores| {
///     let node = stores.node(&[1], &[]);
///     assert_eq!(node, 0);
/// });
/// ```
pub fn with_temp_stores<F, R>(f: F) -> R
where
    F: FnOnce(&TestStores) -> R,
{
    let stores = TestStores::memory();
    f(&stores)
}

/// Runs a test with temporary file-backed stores.
pub fn with_file_stores<F, R>(f: F) -> R
where
    F: FnOnce(&TestStores, &Path) -> R,
{
    let stores = TestStores::file();
    let path = stores
        .path()
        .expect("File stores should have a path")
        .to_path_buf();
    f(&stores, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Ids written by [`sample_graph`].
    #[derive(Debug, Clone, Copy)]
    pub struct SampleGraph {
        /// Labels {3, 7}; {1: "a"} and {2: 42} in two property records.
        pub labelled: u64,
        /// Label {3}, no properties.
        pub no_properties: u64,
        /// No labels, {1: "b"}.
        pub no_labels: u64,
        /// Deleted node that had label {7} and {1: "x"}.
        pub deleted: u64,
        /// Label {7}, a long string and an array.
        pub dynamic_values: u64,
        /// Eight labels kept in the label store, {4: true}.
        pub many_labels: u64,
        /// Relationship of type 9 with {1: 1.5}.
        pub relationship: u64,
        /// Relationship of type 10 without properties.
        pub bare_relationship: u64,
    }

    /// Long string value of [`SampleGraph::dynamic_values`].
    pub const LONG_STRING: &str =
        "a string long enough to need several records in the string store";

    /// Writes a small graph covering the sparse and dense cases.
    pub fn sample_graph() -> (TestStores, SampleGraph) {
        let stores = TestStores::memory();

        let labelled = stores.node_with_records(
            &[7, 3],
            &[&[(1, Value::from("a"))], &[(2, Value::Long(42))]],
        );
        let no_properties = stores.node(&[3], &[]);
        let no_labels = stores.node(&[], &[(1, Value::from("b"))]);
        let deleted = stores.node(&[7], &[(1, Value::from("x"))]);
        stores.delete_node(deleted);
        let dynamic_values = stores.node(
            &[7],
            &[
                (5, Value::from(LONG_STRING)),
                (6, Value::from(vec![1i32, 2, 3])),
            ],
        );
        let many_labels = stores.node(&[1, 2, 3, 4, 5, 6, 7, 8], &[(4, Value::Bool(true))]);

        let relationship =
            stores.relationship(labelled, dynamic_values, 9, &[(1, Value::Double(1.5))]);
        let bare_relationship = stores.relationship(dynamic_values, labelled, 10, &[]);

        let ids = SampleGraph {
            labelled,
            no_properties,
            no_labels,
            deleted,
            dynamic_values,
            many_labels,
            relationship,
            bare_relationship,
        };
        (stores, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordview_core::IndexStoreView;

    #[test]
    fn test_memory_stores() {
        let stores = TestStores::memory();
        assert!(stores.path().is_none());
        assert_eq!(stores.nodes().high_id().unwrap(), 0);
    }

    #[test]
    fn test_file_stores() {
        with_file_stores(|stores, path| {
            stores.node(&[1], &[(1, Value::Int(1))]);
            stores.flush().unwrap();
            assert!(path.join(Stores::NODE_FILE).exists());
        });
    }

    #[test]
    fn properties_pack_into_records() {
        let stores = TestStores::memory();
        // 1 + 2 + 1 slots fit one record, the next long starts another
        let head = stores.write_properties(&[
            (1, Value::Int(1)),
            (2, Value::Long(2)),
            (3, Value::Bool(true)),
            (4, Value::Long(4)),
        ]);
        let records: Vec<_> = stores
            .property_chain(head)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].blocks().len(), 3);
        assert_eq!(records[1].blocks()[0].key(), 4);
    }

    #[test]
    fn wide_label_sets_spill() {
        let stores = TestStores::memory();
        let raw = stores.labels_field(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(LabelsField::parse(raw), LabelsField::Dynamic { .. }));
        assert_eq!(
            LabelsField::parse(raw).tokens(0, stores.labels()).unwrap(),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_sample_scenario() {
        let (stores, ids) = scenarios::sample_graph();
        let update = stores
            .view()
            .node_as_updates(ids.dynamic_values)
            .unwrap()
            .unwrap();
        assert_eq!(update.property(5), Some(&Value::from(scenarios::LONG_STRING)));
    }
}
