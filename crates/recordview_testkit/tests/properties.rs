//! Property tests: views over generated node stores agree with the layout
//! that was written.

use proptest::prelude::*;
use recordview_core::{
    contains_any_token, CoreResult, EntityType, InMemoryLabelIndex, LabelIndexedStoreView,
};
use recordview_testkit::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

fn scan(
    view: &dyn IndexStoreView,
    labels: &[u32],
    filter: PropertyKeyFilter,
) -> Vec<EntityUpdates> {
    let mut updates = Vec::new();
    let mut scan = view.visit_nodes(
        labels,
        filter,
        Some(Box::new(|update: EntityUpdates| -> CoreResult<bool> {
            updates.push(update);
            Ok(false)
        })),
        None,
        false,
    );
    scan.run().unwrap();
    drop(scan);
    updates
}

fn expected_scan(
    specs: &[NodeSpec],
    labels: &[u32],
    keys: Option<&BTreeSet<u32>>,
) -> Vec<EntityUpdates> {
    specs
        .iter()
        .enumerate()
        .filter(|(_, spec)| spec.in_use && contains_any_token(labels, &spec.labels))
        .filter_map(|(id, spec)| {
            let mut builder =
                EntityUpdates::for_entity(id as u64).with_tokens(spec.labels.clone());
            for (key, value) in &spec.properties {
                if keys.map_or(true, |keys| keys.contains(key)) {
                    builder.added(*key, value.clone());
                }
            }
            builder.has_properties().then(|| builder.build())
        })
        .collect()
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn node_updates_match_written_layout(specs in node_specs_strategy(12)) {
        let stores = TestStores::memory();
        let ids = stores.nodes_from_specs(&specs);
        let view = stores.view();

        for (spec, id) in specs.iter().zip(ids) {
            prop_assert_eq!(view.node_as_updates(id).unwrap(), spec.expected_update(id));
        }
    }

    #[test]
    fn full_scan_matches_per_node_updates(specs in node_specs_strategy(12)) {
        let stores = TestStores::memory();
        stores.nodes_from_specs(&specs);

        let expected: Vec<EntityUpdates> = specs
            .iter()
            .enumerate()
            .filter_map(|(id, spec)| spec.expected_update(id as u64))
            .collect();
        prop_assert_eq!(scan(&stores.view(), &[], PropertyKeyFilter::All), expected);
    }

    #[test]
    fn filtered_scans_agree_with_label_index(
        specs in node_specs_strategy(16),
        labels in prop::collection::vec(0u32..64, 1..3),
        keys in prop::collection::btree_set(0u32..32, 1..6),
    ) {
        let stores = TestStores::memory();
        stores.nodes_from_specs(&specs);
        let records = stores.view();
        let index = Arc::new(InMemoryLabelIndex::new());
        index.populate(&records).unwrap();
        let indexed = LabelIndexedStoreView::new(records.clone(), index);

        let expected = expected_scan(&specs, &labels, Some(&keys));
        prop_assert_eq!(
            &scan(&records, &labels, PropertyKeyFilter::keys(keys.iter().copied())),
            &expected
        );
        prop_assert_eq!(
            &scan(&indexed, &labels, PropertyKeyFilter::keys(keys.iter().copied())),
            &expected
        );
    }

    #[test]
    fn lookups_and_selective_loads_match_properties(
        spec in node_spec_strategy(),
        wanted in prop::collection::hash_set(0u32..32, 0..8),
    ) {
        let stores = TestStores::memory();
        let id = stores.nodes_from_specs(std::slice::from_ref(&spec))[0];
        let view = stores.view();
        let properties = spec.property_map();

        for key in &wanted {
            let value = view.node_property_value(id, *key);
            if spec.in_use {
                prop_assert_eq!(value.unwrap(), properties.get(key).cloned());
            } else {
                prop_assert!(value.unwrap_err().is_not_found());
            }
        }

        let mut keys: HashSet<u32> = wanted.clone();
        let mut loaded = Vec::new();
        let mut sink = |key: u32, value: Value| loaded.push((key, value));
        view.load_properties(id, EntityType::Node, &mut keys, &mut sink).unwrap();

        let mut expected_left = wanted.clone();
        if spec.in_use {
            expected_left.retain(|key| !properties.contains_key(key));
        }
        prop_assert_eq!(&keys, &expected_left);
        for (key, value) in &loaded {
            prop_assert_eq!(Some(value), properties.get(key));
        }
        prop_assert_eq!(loaded.len(), wanted.len() - expected_left.len());
    }
}
