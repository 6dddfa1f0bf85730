//! Property records and the blocks packed inside them.

use super::{check_len, get_u64, put_u64, Record, RecordFlags};
use crate::error::{CoreError, CoreResult};
use crate::types::{id_from_raw, id_to_raw, PropertyKeyId};
use recordview_codec::{
    dynamic_pointer, encode_inline, encode_pointer, BlockHeader, PropertyType, Value,
};

/// Payload slots per property record.
pub const PROPERTY_SLOTS: usize = 4;

/// One property stored in a property record.
///
/// A block occupies one or two consecutive payload slots. The first slot is
/// the packed [`BlockHeader`]; `Long` and `Double` keep their value in the
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyBlock {
    key: PropertyKeyId,
    ty: PropertyType,
    slots: [u64; 2],
}

impl PropertyBlock {
    /// Creates a block holding an inline value.
    ///
    /// # Errors
    ///
    /// Fails for string and array values and keys outside the key space.
    pub fn inline(key: PropertyKeyId, value: &Value) -> CoreResult<Self> {
        let encoded = encode_inline(key, value)?;
        let mut slots = [0u64; 2];
        slots[..encoded.len()].copy_from_slice(&encoded);
        Ok(Self {
            key,
            ty: PropertyType::of(value),
            slots,
        })
    }

    /// Creates a block pointing at the first record of a dynamic chain.
    ///
    /// # Errors
    ///
    /// Fails for inline types and out of range keys or ids.
    pub fn pointer(key: PropertyKeyId, ty: PropertyType, dynamic_id: u64) -> CoreResult<Self> {
        Ok(Self {
            key,
            ty,
            slots: [encode_pointer(key, ty, dynamic_id)?, 0],
        })
    }

    /// Property key.
    #[must_use]
    pub fn key(&self) -> PropertyKeyId {
        self.key
    }

    /// Value type.
    #[must_use]
    pub fn property_type(&self) -> PropertyType {
        self.ty
    }

    /// The slots this block occupies, header first.
    #[must_use]
    pub fn slots(&self) -> &[u64] {
        &self.slots[..self.ty.slot_count()]
    }

    /// First dynamic record of a string or array value.
    #[must_use]
    pub fn dynamic_id(&self) -> Option<u64> {
        if self.ty.is_inline() {
            None
        } else {
            Some(dynamic_pointer(self.slots[0]))
        }
    }
}

/// A property record.
///
/// Layout (41 bytes): `flags u8 | next_prop u64 | payload [u64; 4]`. Blocks
/// are packed from the first payload slot; an empty header ends the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyRecord {
    id: u64,
    in_use: bool,
    next_prop: Option<u64>,
    blocks: Vec<PropertyBlock>,
}

impl PropertyRecord {
    /// Slot size in bytes.
    pub const SIZE: usize = 1 + 8 + PROPERTY_SLOTS * 8;

    /// Creates an empty in-use property record.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            in_use: true,
            next_prop: None,
            blocks: Vec::new(),
        }
    }

    /// Sets the next record of the chain.
    #[must_use]
    pub fn with_next_prop(mut self, next_prop: Option<u64>) -> Self {
        self.next_prop = next_prop;
        self
    }

    /// Marks the record in use or free.
    pub fn set_in_use(&mut self, in_use: bool) {
        self.in_use = in_use;
    }

    /// Next record of the chain.
    #[must_use]
    pub fn next_prop(&self) -> Option<u64> {
        self.next_prop
    }

    /// Blocks in slot order.
    #[must_use]
    pub fn blocks(&self) -> &[PropertyBlock] {
        &self.blocks
    }

    /// First block for `key`.
    #[must_use]
    pub fn block(&self, key: PropertyKeyId) -> Option<&PropertyBlock> {
        self.blocks.iter().find(|block| block.key == key)
    }

    /// Payload slots still free.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        PROPERTY_SLOTS - self.used_slots()
    }

    /// Appends a block.
    ///
    /// # Errors
    ///
    /// Fails if the block does not fit the remaining slots.
    pub fn add_block(&mut self, block: PropertyBlock) -> CoreResult<()> {
        if block.ty.slot_count() > self.free_slots() {
            return Err(CoreError::invalid_operation(format!(
                "property record {} has no room for a {} block",
                self.id, block.ty
            )));
        }
        self.blocks.push(block);
        Ok(())
    }

    fn used_slots(&self) -> usize {
        self.blocks.iter().map(|b| b.ty.slot_count()).sum()
    }

    fn decode_blocks(&mut self, bytes: &[u8]) -> CoreResult<()> {
        let mut slots = [0u64; PROPERTY_SLOTS];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = get_u64(bytes, 9 + i * 8);
        }

        let mut i = 0;
        while i < PROPERTY_SLOTS {
            let header = BlockHeader::unpack(slots[i]);
            if header.is_empty() {
                break;
            }
            let ty = header.property_type().map_err(|e| {
                CoreError::invalid_record(Self::STORE, self.id, format!("slot {i}: {e}"))
            })?;
            let width = ty.slot_count();
            if i + width > PROPERTY_SLOTS {
                return Err(CoreError::invalid_record(
                    Self::STORE,
                    self.id,
                    format!("{ty} block at slot {i} overruns the record"),
                ));
            }
            let mut block_slots = [0u64; 2];
            block_slots[..width].copy_from_slice(&slots[i..i + width]);
            self.blocks.push(PropertyBlock {
                key: header.key,
                ty,
                slots: block_slots,
            });
            i += width;
        }
        Ok(())
    }
}

impl Record for PropertyRecord {
    const STORE: &'static str = "property";

    fn id(&self) -> u64 {
        self.id
    }

    fn in_use(&self) -> bool {
        self.in_use
    }

    fn reset(&mut self, id: u64) {
        self.id = id;
        self.in_use = false;
        self.next_prop = None;
        self.blocks.clear();
    }

    fn decode_into(&mut self, id: u64, bytes: &[u8]) -> CoreResult<()> {
        check_len(Self::STORE, id, bytes, Self::SIZE)?;
        self.reset(id);
        self.in_use = RecordFlags::from_byte(bytes[0]).in_use();
        self.next_prop = id_from_raw(get_u64(bytes, 1));
        if self.in_use {
            self.decode_blocks(bytes)?;
        }
        Ok(())
    }

    fn encode_into(&self, buf: &mut [u8]) -> CoreResult<()> {
        check_len(Self::STORE, self.id, buf, Self::SIZE)?;
        buf[0] = RecordFlags::NONE
            .with(RecordFlags::IN_USE, self.in_use)
            .as_byte();
        put_u64(buf, 1, id_to_raw(self.next_prop));

        let mut at = 9;
        for slot in self.blocks.iter().flat_map(PropertyBlock::slots) {
            if at >= Self::SIZE {
                return Err(CoreError::invalid_record(
                    Self::STORE,
                    self.id,
                    "blocks exceed the payload slots",
                ));
            }
            put_u64(buf, at, *slot);
            at += 8;
        }
        Ok(())
    }
}
