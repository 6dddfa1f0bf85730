//! Core type definitions for RecordView.

use serde::Serialize;
use std::fmt;

/// Label or relationship type id.
pub type TokenId = u32;

/// Property key id.
pub type PropertyKeyId = u32;

/// On-disk sentinel for "no record". Never exposed past the record layer.
pub const NO_ID: u64 = u64::MAX;

/// Highest addressable record id in any store.
///
/// Dynamic record pointers inside property blocks and label fields are
/// 36 bits wide, so every store shares that limit.
pub const MAX_RECORD_ID: u64 = recordview_codec::MAX_INLINE_PAYLOAD;

/// Converts an on-disk pointer to an optional record id.
#[inline]
#[must_use]
pub const fn id_from_raw(raw: u64) -> Option<u64> {
    if raw == NO_ID {
        None
    } else {
        Some(raw)
    }
}

/// Converts an optional record id to its on-disk pointer.
#[inline]
#[must_use]
pub const fn id_to_raw(id: Option<u64>) -> u64 {
    match id {
        Some(id) => id,
        None => NO_ID,
    }
}

/// Kind of entity a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// A node, tokens are labels.
    Node,
    /// A relationship, the token is its type.
    Relationship,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Relationship => f.write_str("relationship"),
        }
    }
}

/// Identifier of an index in the counts store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexId(pub u64);

impl IndexId {
    /// Creates a new index ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index:{}", self.0)
    }
}
