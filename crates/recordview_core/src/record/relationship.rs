//! Relationship records.

use super::{check_len, get_u32, get_u64, put_u32, put_u64, PrimitiveRecord, Record, RecordFlags};
use crate::error::CoreResult;
use crate::types::{id_from_raw, id_to_raw, TokenId};

/// A relationship record.
///
/// Layout (33 bytes):
/// `flags u8 | first_node u64 | second_node u64 | type u32 | next_prop u64`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipRecord {
    id: u64,
    in_use: bool,
    first_node: u64,
    second_node: u64,
    rel_type: TokenId,
    next_prop: Option<u64>,
}

impl RelationshipRecord {
    /// Slot size in bytes.
    pub const SIZE: usize = 33;

    /// Creates an in-use relationship without properties.
    #[must_use]
    pub fn new(id: u64, first_node: u64, second_node: u64, rel_type: TokenId) -> Self {
        Self {
            id,
            in_use: true,
            first_node,
            second_node,
            rel_type,
            next_prop: None,
        }
    }

    /// Sets the first property record.
    #[must_use]
    pub fn with_next_prop(mut self, next_prop: Option<u64>) -> Self {
        self.next_prop = next_prop;
        self
    }

    /// Marks the record in use or free.
    pub fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
    }

    /// Start node.
    #[must_use]
    pub fn first_node(&self) -> u64 {
        self.first_node
    }

    /// End node.
    #[must_use]
    pub fn second_node(&self) -> u64 {
        self.second_node
    }

    /// Relationship type token.
    #[must_use]
    pub fn rel_type(&self) -> TokenId {
        self.rel_type
    }
}

impl Record for RelationshipRecord {
    const STORE: &'static str = "relationship";

    fn id(&self) -> u64 {
        self.id
    }

    fn in_use(&self) -> bool {
        self.in_use
    }

    fn reset(&mut self, id: u64) {
        *self = Self {
            id,
            ..Self::default()
        };
    }

    fn decode_into(&mut self, id: u64, bytes: &[u8]) -> CoreResult<()> {
        check_len(Self::STORE, id, bytes, Self::SIZE)?;
        self.id = id;
        self.in_use = RecordFlags::from_byte(bytes[0]).in_use();
        self.first_node = get_u64(bytes, 1);
        self.second_node = get_u64(bytes, 9);
        self.rel_type = get_u32(bytes, 17);
        self.next_prop = id_from_raw(get_u64(bytes, 21));
        Ok(())
    }

    fn encode_into(&self, buf: &mut [u8]) -> CoreResult<()> {
        check_len(Self::STORE, self.id, buf, Self::SIZE)?;
        buf[0] = RecordFlags::NONE
            .with(RecordFlags::IN_USE, self.in_use)
            .as_byte();
        put_u64(buf, 1, self.first_node);
        put_u64(buf, 9, self.second_node);
        put_u32(buf, 17, self.rel_type);
        put_u64(buf, 21, id_to_raw(self.next_prop));
        Ok(())
    }
}

impl PrimitiveRecord for RelationshipRecord {
    fn next_prop(&self) -> Option<u64> {
        self.next_prop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode() {
        let rel = RelationshipRecord::new(2, 10, 11, 7).with_next_prop(Some(4));
        let mut buf = [0u8; RelationshipRecord::SIZE];
        rel.encode_into(&mut buf).unwrap();

        let mut decoded = RelationshipRecord::default();
        decoded.decode_into(2, &buf).unwrap();
        assert_eq!(decoded, rel);
        assert_eq!(decoded.rel_type(), 7);
        assert_eq!(decoded.first_node(), 10);
        assert_eq!(decoded.second_node(), 11);
    }

    #[test]
    fn reset_clears_fields() {
        let mut rel = RelationshipRecord::new(2, 10, 11, 7);
        rel.reset(8);
        assert_eq!(rel.id(), 8);
        assert!(!rel.in_use());
        assert_eq!(rel.next_prop(), None);
    }
}
