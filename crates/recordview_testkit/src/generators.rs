//! Property-based test generators using proptest.
//!
//! Provides strategies for values, label sets and whole node layouts,
//! together with the updates a view is expected to produce for them.

use proptest::prelude::*;
use recordview_core::{ArrayValue, EntityUpdates, PropertyKeyId, TokenId, Value};
use std::collections::BTreeMap;

/// Strategy for property keys from a small key space so keys collide.
pub fn property_key_strategy() -> impl Strategy<Value = PropertyKeyId> {
    0u32..32
}

/// Strategy for inline property values.
pub fn inline_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i8>().prop_map(Value::Byte),
        any::<i16>().prop_map(Value::Short),
        any::<char>().prop_map(Value::Char),
        any::<i32>().prop_map(Value::Int),
        any::<i64>().prop_map(Value::Long),
        (-1.0e6f32..1.0e6f32).prop_map(Value::Float),
        (-1.0e12f64..1.0e12f64).prop_map(Value::Double),
    ]
}

/// Strategy for values kept in the string and array stores.
pub fn dynamic_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        ".{0,80}".prop_map(Value::String),
        prop::collection::vec(any::<i32>(), 0..20).prop_map(|v| Value::Array(ArrayValue::Int(v))),
        prop::collection::vec(any::<i64>(), 0..20)
            .prop_map(|v| Value::Array(ArrayValue::Long(v))),
        prop::collection::vec(any::<bool>(), 0..40)
            .prop_map(|v| Value::Array(ArrayValue::Bool(v))),
        prop::collection::vec("[a-z]{0,12}", 0..6)
            .prop_map(|v| Value::Array(ArrayValue::String(v))),
    ]
}

/// Strategy for any property value.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => inline_value_strategy(),
        1 => dynamic_value_strategy(),
    ]
}

/// Strategy for label sets; larger sets spill to the label store.
pub fn labels_strategy() -> impl Strategy<Value = Vec<TokenId>> {
    prop_oneof![
        3 => prop::collection::btree_set(0u32..64, 0..4),
        1 => prop::collection::btree_set(0u32..100_000, 0..12),
    ]
    .prop_map(|labels| labels.into_iter().collect())
}

/// Strategy for a property list with distinct keys.
pub fn properties_strategy() -> impl Strategy<Value = Vec<(PropertyKeyId, Value)>> {
    prop::collection::btree_map(property_key_strategy(), value_strategy(), 0..8)
        .prop_map(|properties| properties.into_iter().collect())
}

/// Layout of one node to write.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    /// Whether the node stays in use.
    pub in_use: bool,
    /// Labels, sorted and distinct.
    pub labels: Vec<TokenId>,
    /// Properties with distinct keys.
    pub properties: Vec<(PropertyKeyId, Value)>,
}

impl NodeSpec {
    /// Update a view should produce for this node, or `None` if the node
    /// is skipped as sparse or not in use.
    pub fn expected_update(&self, id: u64) -> Option<EntityUpdates> {
        if !self.in_use || self.labels.is_empty() || self.properties.is_empty() {
            return None;
        }
        let mut builder = EntityUpdates::for_entity(id).with_tokens(self.labels.clone());
        for (key, value) in &self.properties {
            builder.added(*key, value.clone());
        }
        Some(builder.build())
    }

    /// Properties as a map.
    pub fn property_map(&self) -> BTreeMap<PropertyKeyId, Value> {
        self.properties.iter().cloned().collect()
    }
}

/// Strategy for a single node layout.
pub fn node_spec_strategy() -> impl Strategy<Value = NodeSpec> {
    (prop::bool::weighted(0.85), labels_strategy(), properties_strategy()).prop_map(
        |(in_use, labels, properties)| NodeSpec {
            in_use,
            labels,
            properties,
        },
    )
}

/// Strategy for a node store of up to `max_nodes` nodes.
pub fn node_specs_strategy(max_nodes: usize) -> impl Strategy<Value = Vec<NodeSpec>> {
    prop::collection::vec(node_spec_strategy(), 0..max_nodes)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
