//! Node records.

use super::{check_len, get_u64, put_u64, PrimitiveRecord, Record, RecordFlags};
use crate::error::CoreResult;
use crate::labels::LabelsField;
use crate::types::{id_from_raw, id_to_raw};

/// A node record.
///
/// Layout (17 bytes): `flags u8 | next_prop u64 | labels u64`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRecord {
    id: u64,
    in_use: bool,
    next_prop: Option<u64>,
    labels: u64,
}

impl NodeRecord {
    /// Slot size in bytes.
    pub const SIZE: usize = 17;

    /// Creates an in-use node without labels or properties.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            in_use: true,
            next_prop: None,
            labels: 0,
        }
    }

    /// Sets the first property record.
    #[must_use]
    pub fn with_next_prop(mut self, next_prop: Option<u64>) -> Self {
        self.next_prop = next_prop;
        self
    }

    /// Sets the raw labels field.
    #[must_use]
    pub fn with_labels(mut self, labels: u64) -> Self {
        self.labels = labels;
        self
    }

    /// Marks the record in use or free.
    pub fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
    }

    /// Raw labels field as stored.
    #[must_use]
    pub fn labels_raw(&self) -> u64 {
        self.labels
    }

    /// Parsed labels field.
    #[must_use]
    pub fn labels(&self) -> LabelsField {
        LabelsField::parse(self.labels)
    }
}

impl Record for NodeRecord {
    const STORE: &'static str = "node";

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
        let flags = RecordFlags::from_byte(bytes[0]);
        self.id = id;
        self.in_use = flags.in_use();
        self.next_prop = id_from_raw(get_u64(bytes, 1));
        self.labels = get_u64(bytes, 9);
        Ok(())
    }

    fn encode_into(&self, buf: &mut [u8]) -> CoreResult<()> {
        check_len(Self::STORE, self.id, buf, Self::SIZE)?;
        buf[0] = RecordFlags::NONE
            .with(RecordFlags::IN_USE, self.in_use)
            .as_byte();
        put_u64(buf, 1, id_to_raw(self.next_prop));
        put_u64(buf, 9, self.labels);
        Ok(())
    }
}

impl PrimitiveRecord for NodeRecord {
    fn next_prop(&self) -> Option<u64> {
        self.next_prop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_ID;

    #[test]
    fn encode_decode() {
        let node = NodeRecord::new(5).with_next_prop(Some(9)).with_labels(0x42);
        let mut buf = [0u8; NodeRecord::SIZE];
        node.encode_into(&mut buf).unwrap();

        assert_eq!(buf[0], 0x01);
        let mut decoded = NodeRecord::default();
        decoded.decode_into(5, &buf).unwrap();
        assert_eq!(decoded, node);
    }

    #[test]
    fn sentinel_pointer_decodes_to_none() {
        let mut buf = [0u8; NodeRecord::SIZE];
        buf[0] = 0x01;
        buf[1..9].copy_from_slice(&NO_ID.to_le_bytes());

        let mut node = NodeRecord::new(99).with_next_prop(Some(1));
        node.decode_into(3, &buf).unwrap();
        assert_eq!(node.id(), 3);
        assert!(node.in_use());
        assert_eq!(node.next_prop(), None);
    }

    #[test]
    fn free_slot() {
        let buf = [0u8; NodeRecord::SIZE];
        let mut node = NodeRecord::new(1);
        node.decode_into(1, &buf).unwrap();
        assert!(!node.in_use());
    }

    #[test]
    fn short_slot_is_invalid() {
        let mut node = NodeRecord::default();
        assert!(node.decode_into(0, &[1, 2, 3]).unwrap_err().is_corruption());
    }
}
