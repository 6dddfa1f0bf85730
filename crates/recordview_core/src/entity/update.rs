//! Entity update values handed to index population.

use crate::types::{PropertyKeyId, TokenId};
use recordview_codec::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Snapshot of one entity: its tokens and decoded properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityUpdates {
    entity_id: u64,
    tokens: Vec<TokenId>,
    properties: BTreeMap<PropertyKeyId, Value>,
}

impl EntityUpdates {
    /// Starts building the update of `entity_id`.
    #[must_use]
    pub fn for_entity(entity_id: u64) -> EntityUpdatesBuilder {
        EntityUpdatesBuilder {
            updates: Self {
                entity_id,
                tokens: Vec::new(),
                properties: BTreeMap::new(),
            },
        }
    }

    /// The entity id.
    #[must_use]
    pub fn entity_id(&self) -> u64 {
        self.entity_id
    }

    /// Labels of a node or the type of a relationship, ascending.
    #[must_use]
    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    /// Whether the entity carries `token`.
    #[must_use]
    pub fn has_token(&self, token: TokenId) -> bool {
        self.tokens.binary_search(&token).is_ok()
    }

    /// Properties by key.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<PropertyKeyId, Value> {
        &self.properties
    }

    /// Value of one property.
    #[must_use]
    pub fn property(&self, key: PropertyKeyId) -> Option<&Value> {
        self.properties.get(&key)
    }
}

/// Builder for [`EntityUpdates`].
#[derive(Debug, Clone)]
pub struct EntityUpdatesBuilder {
    updates: EntityUpdates,
}

impl EntityUpdatesBuilder {
    /// Sets the entity tokens.
    #[must_use]
    pub fn with_tokens(mut self, tokens: impl Into<Vec<TokenId>>) -> Self {
        let mut tokens = tokens.into();
        tokens.sort_unstable();
        tokens.dedup();
        self.updates.tokens = tokens;
        self
    }

    /// Adds a property. A later value for the same key replaces the earlier.
    pub fn added(&mut self, key: PropertyKeyId, value: Value) -> &mut Self {
        self.updates.properties.insert(key, value);
        self
    }

    /// Whether any property was added.
    #[must_use]
    pub fn has_properties(&self) -> bool {
        !self.updates.properties.is_empty()
    }

    /// Finishes the update.
    #[must_use]
    pub fn build(self) -> EntityUpdates {
        self.updates
    }
}

/// Label state of a node as seen by a scan.
///
/// Store scans see only the current labels, so `labels_before` is empty for
/// the updates they produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLabelUpdate {
    node_id: u64,
    labels_before: Vec<TokenId>,
    labels_after: Vec<TokenId>,
}

impl NodeLabelUpdate {
    /// A change from `before` to `after`. Both are sorted and deduplicated.
    #[must_use]
    pub fn label_changes(node_id: u64, before: Vec<TokenId>, after: Vec<TokenId>) -> Self {
        Self {
            node_id,
            labels_before: normalized(before),
            labels_after: normalized(after),
        }
    }

    /// The labels a scan found on a node.
    #[must_use]
    pub fn scanned(node_id: u64, labels: Vec<TokenId>) -> Self {
        Self::label_changes(node_id, Vec::new(), labels)
    }

    /// The node id.
    #[must_use]
    pub fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Labels before the change.
    #[must_use]
    pub fn labels_before(&self) -> &[TokenId] {
        &self.labels_before
    }

    /// Labels after the change.
    #[must_use]
    pub fn labels_after(&self) -> &[TokenId] {
        &self.labels_after
    }

    /// Labels present after but not before.
    #[must_use]
    pub fn added_labels(&self) -> Vec<TokenId> {
        difference(&self.labels_after, &self.labels_before)
    }

    /// Labels present before but not after.
    #[must_use]
    pub fn removed_labels(&self) -> Vec<TokenId> {
        difference(&self.labels_before, &self.labels_after)
    }
}

fn normalized(mut labels: Vec<TokenId>) -> Vec<TokenId> {
    labels.sort_unstable();
    labels.dedup();
    labels
}

fn difference(from: &[TokenId], without: &[TokenId]) -> Vec<TokenId> {
    from.iter()
        .copied()
        .filter(|label| without.binary_search(label).is_err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let mut builder = EntityUpdates::for_entity(9).with_tokens(vec![7, 3, 7]);
        assert!(!builder.has_properties());
        builder.added(1, Value::from("a")).added(2, Value::Int(42));
        let updates = builder.build();

        assert_eq!(updates.entity_id(), 9);
        assert_eq!(updates.tokens(), &[3, 7]);
        assert!(updates.has_token(7));
        assert!(!updates.has_token(4));
        assert_eq!(updates.property(1), Some(&Value::from("a")));
        assert_eq!(updates.properties().len(), 2);
    }

    #[test]
    fn later_value_wins() {
        let mut builder = EntityUpdates::for_entity(1);
        builder.added(5, Value::Int(1)).added(5, Value::Int(2));
        assert_eq!(builder.build().property(5), Some(&Value::Int(2)));
    }

    #[test]
    fn label_changes() {
        let update = NodeLabelUpdate::label_changes(4, vec![1, 2], vec![3, 2]);
        assert_eq!(update.added_labels(), vec![3]);
        assert_eq!(update.removed_labels(), vec![1]);

        let scanned = NodeLabelUpdate::scanned(4, vec![9, 8]);
        assert!(scanned.labels_before().is_empty());
        assert_eq!(scanned.added_labels(), vec![8, 9]);
    }

    #[test]
    fn serializes_to_json() {
        let mut builder = EntityUpdates::for_entity(2).with_tokens(vec![1]);
        builder.added(3, Value::Bool(true));
        let json = serde_json::to_string(&builder.build()).unwrap();
        assert_eq!(json, r#"{"entity_id":2,"tokens":[1],"properties":{"3":true}}"#);
    }
}
