//! Dynamic records holding string, array and label payloads.

use super::{check_len, get_u32, get_u64, put_u32, put_u64, Record, RecordFlags};
use crate::error::{CoreError, CoreResult};
use crate::types::{id_from_raw, id_to_raw};

/// A dynamic record, one link of a payload chain.
///
/// Layout (`size` bytes, configurable per store):
/// `flags u8 | next u64 | len u32 | data [u8; size - 13]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicRecord {
    id: u64,
    in_use: bool,
    start: bool,
    next: Option<u64>,
    data: Vec<u8>,
}

impl DynamicRecord {
    /// Bytes before the data area.
    pub const HEADER_SIZE: usize = 13;
    /// Smallest supported slot size.
    pub const MIN_SIZE: usize = 16;

    /// Creates an in-use dynamic record.
    #[must_use]
    pub fn new(id: u64, start: bool, next: Option<u64>, data: Vec<u8>) -> Self {
        Self {
            id,
            in_use: true,
            start,
            next,
            data,
        }
    }

    /// Data bytes per record for a slot size.
    #[must_use]
    pub const fn capacity(record_size: usize) -> usize {
        record_size.saturating_sub(Self::HEADER_SIZE)
    }

    /// Marks the record in use or free.
    pub fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
    }

    /// Whether this record begins a chain.
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.start
    }

    /// Next record of the chain.
    #[must_use]
    pub fn next(&self) -> Option<u64> {
        self.next
    }

    /// Data carried by this record.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Record for DynamicRecord {
    const STORE: &'static str = "dynamic";

    fn id(&self) -> u64 {
        self.id
    }

    fn in_use(&self) -> bool {
        self.in_use
    }

    fn reset(&mut self, id: u64) {
        self.id = id;
        self.in_use = false;
        self.start = false;
        self.next = None;
        self.data.clear();
    }

    fn decode_into(&mut self, id: u64, bytes: &[u8]) -> CoreResult<()> {
        check_len(Self::STORE, id, bytes, Self::MIN_SIZE)?;
        self.reset(id);
        let flags = RecordFlags::from_byte(bytes[0]);
        self.in_use = flags.in_use();
        self.start = flags.is_start();
        self.next = id_from_raw(get_u64(bytes, 1));

        let capacity = bytes.len() - Self::HEADER_SIZE;
        let len = get_u32(bytes, 9) as usize;
        if len > capacity {
            if self.in_use {
                return Err(CoreError::invalid_record(
                    Self::STORE,
                    id,
                    format!("length {len} exceeds capacity {capacity}"),
                ));
            }
            return Ok(());
        }
        self.data
            .extend_from_slice(&bytes[Self::HEADER_SIZE..Self::HEADER_SIZE + len]);
        Ok(())
    }

    fn encode_into(&self, buf: &mut [u8]) -> CoreResult<()> {
        check_len(Self::STORE, self.id, buf, Self::MIN_SIZE)?;
        let capacity = buf.len() - Self::HEADER_SIZE;
        if self.data.len() > capacity {
            return Err(CoreError::invalid_record(
                Self::STORE,
                self.id,
                format!("{} data bytes exceed capacity {capacity}", self.data.len()),
            ));
        }
        buf[0] = RecordFlags::NONE
            .with(RecordFlags::IN_USE, self.in_use)
            .with(RecordFlags::START, self.start)
            .as_byte();
        put_u64(buf, 1, id_to_raw(self.next));
        put_u32(buf, 9, self.data.len() as u32);
        buf[Self::HEADER_SIZE..Self::HEADER_SIZE + self.data.len()].copy_from_slice(&self.data);
        Ok(())
    }
}
