//! Fixed-size record formats.
//!
//! Every store is an array of equally sized slots; a record's id is its slot
//! index. All integers are little-endian and every record starts with a flags
//! byte whose lowest bit marks the slot as in use.
//!
//! Missing pointers are written as [`NO_ID`](crate::types::NO_ID) on disk and
//! surface as `None` on the decoded records.

mod dynamic;
mod node;
mod property;
mod relationship;

pub use dynamic::DynamicRecord;
pub use node::NodeRecord;
pub use property::{PropertyBlock, PropertyRecord, PROPERTY_SLOTS};
pub use relationship::RelationshipRecord;

use crate::error::CoreResult;
use std::fmt;

/// Flags byte at the start of every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordFlags(u8);

impl RecordFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Slot holds a live record.
    pub const IN_USE: Self = Self(0x01);
    /// Dynamic record begins a chain.
    pub const START: Self = Self(0x02);

    /// Creates flags from the raw byte.
    #[must_use]
    pub const fn from_byte(b: u8) -> Self {
        Self(b)
    }

    /// Returns the raw byte value.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Checks the in-use bit.
    #[must_use]
    pub const fn in_use(self) -> bool {
        self.0 & 0x01 != 0
    }

    /// Checks the chain start bit.
    #[must_use]
    pub const fn is_start(self) -> bool {
        self.0 & 0x02 != 0
    }

    /// Sets or clears a flag.
    #[must_use]
    pub const fn with(self, flag: Self, on: bool) -> Self {
        if on {
            Self(self.0 | flag.0)
        } else {
            Self(self.0 & !flag.0)
        }
    }
}

/// A record type stored in a [`RecordStore`](crate::store::RecordStore).
///
/// Records are reused as scratch buffers: a store decodes into an existing
/// instance, so implementations must fully overwrite their state in
/// [`decode_into`](Record::decode_into) and [`reset`](Record::reset).
pub trait Record: Default + Clone + fmt::Debug + Send + Sync + 'static {
    /// Store name used in errors and logs.
    const STORE: &'static str;

    /// Record id (slot index).
    fn id(&self) -> u64;

    /// Whether the slot holds a live record.
    fn in_use(&self) -> bool;

    /// Turns the record into an unused record at `id`.
    fn reset(&mut self, id: u64);

    /// Decodes the slot bytes of record `id` into `self`.
    ///
    /// Slots that are not in use never fail to decode.
    fn decode_into(&mut self, id: u64, bytes: &[u8]) -> CoreResult<()>;

    /// Encodes the record into a zeroed slot buffer.
    fn encode_into(&self, buf: &mut [u8]) -> CoreResult<()>;
}

/// Node or relationship record, the head of a property chain.
pub trait PrimitiveRecord: Record {
    /// First record of the property chain.
    fn next_prop(&self) -> Option<u64>;
}

pub(crate) fn check_len(store: &'static str, id: u64, bytes: &[u8], size: usize) -> CoreResult<()> {
    if bytes.len() < size {
        return Err(crate::error::CoreError::invalid_record(
            store,
            id,
            format!("slot holds {} bytes, need {size}", bytes.len()),
        ));
    }
    Ok(())
}

pub(crate) fn get_u64(bytes: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(raw)
}

pub(crate) fn get_u32(bytes: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(raw)
}

pub(crate) fn put_u64(buf: &mut [u8], at: usize, value: u64) {
    buf[at..at + 8].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let flags = RecordFlags::NONE.with(RecordFlags::IN_USE, true);
        assert!(flags.in_use());
        assert!(!flags.is_start());

        let flags = flags.with(RecordFlags::START, true).with(RecordFlags::IN_USE, false);
        assert_eq!(flags.as_byte(), 0x02);
        assert_eq!(RecordFlags::from_byte(0x03), RecordFlags(0x03));
    }

    #[test]
    fn little_endian_helpers() {
        let mut buf = [0u8; 12];
        put_u64(&mut buf, 0, 0x0102_0304_0506_0708);
        put_u32(&mut buf, 8, 0xAABB_CCDD);
        assert_eq!(buf[0], 0x08);
        assert_eq!(get_u64(&buf, 0), 0x0102_0304_0506_0708);
        assert_eq!(get_u32(&buf, 8), 0xAABB_CCDD);
    }
}
