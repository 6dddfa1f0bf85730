//! Node label field decoding.
//!
//! The 64-bit labels field of a node record takes one of two forms:
//!
//! - **Inline** (bit 63 clear): bits 60..63 hold a count `n` of at most 7
//!   labels, packed LSB first into the low 60 bits with `60 / n` bits each
//! - **Dynamic** (bit 63 set): the low 36 bits point at a chain in the label
//!   store holding a label array

use crate::error::{CoreError, CoreResult};
use crate::store::DynamicStore;
use crate::types::TokenId;
use recordview_codec::{decode_label_array, MAX_INLINE_PAYLOAD};

const DYNAMIC_FLAG: u64 = 1 << 63;
const COUNT_SHIFT: u32 = 60;
const COUNT_MASK: u64 = 0x7;
const INLINE_BITS: u32 = 60;
const INLINE_MASK: u64 = (1 << INLINE_BITS) - 1;

/// Most labels an inline field holds.
pub const MAX_INLINE_LABELS: usize = 7;

/// A parsed node labels field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelsField {
    /// Labels packed into the field itself.
    Inline {
        /// Number of labels.
        count: u8,
        /// Packed label bits.
        bits: u64,
    },
    /// Labels stored in the label store.
    Dynamic {
        /// First record of the label array chain.
        head: u64,
    },
}

impl LabelsField {
    /// Raw field of a node without labels.
    pub const EMPTY: u64 = 0;

    /// Parses a raw labels field.
    #[must_use]
    pub const fn parse(raw: u64) -> Self {
        if raw & DYNAMIC_FLAG != 0 {
            Self::Dynamic {
                head: raw & MAX_INLINE_PAYLOAD,
            }
        } else {
            Self::Inline {
                count: ((raw >> COUNT_SHIFT) & COUNT_MASK) as u8,
                bits: raw & INLINE_MASK,
            }
        }
    }

    /// Packs labels inline, or `None` if they do not fit.
    ///
    /// Labels are sorted and deduplicated first; each must fit in
    /// `60 / n` bits.
    #[must_use]
    pub fn inline(labels: &[TokenId]) -> Option<u64> {
        let mut labels = labels.to_vec();
        labels.sort_unstable();
        labels.dedup();

        let count = labels.len();
        if count == 0 {
            return Some(Self::EMPTY);
        }
        if count > MAX_INLINE_LABELS {
            return None;
        }

        let width = INLINE_BITS / count as u32;
        let mut bits = 0u64;
        for (i, label) in labels.iter().enumerate() {
            let label = u64::from(*label);
            if label >> width != 0 {
                return None;
            }
            bits |= label << (width * i as u32);
        }
        Some((count as u64) << COUNT_SHIFT | bits)
    }

    /// Raw field pointing at a label array chain.
    #[must_use]
    pub const fn dynamic(head: u64) -> u64 {
        DYNAMIC_FLAG | (head & MAX_INLINE_PAYLOAD)
    }

    /// Resolves the label ids of node `node_id`, sorted ascending without
    /// duplicates.
    ///
    /// # Errors
    ///
    /// Fails for a damaged label chain or label array, and for an inline
    /// field with a label wider than a token id or bits set past its last
    /// label.
    pub fn tokens(&self, node_id: u64, labels: &DynamicStore) -> CoreResult<Vec<TokenId>> {
        match *self {
            Self::Inline { count, bits } => unpack_inline(node_id, count, bits),
            Self::Dynamic { head } => {
                let payload = labels.read_chain(head)?;
                decode_label_array(&payload).map_err(CoreError::from)
            }
        }
    }
}

fn unpack_inline(node_id: u64, count: u8, bits: u64) -> CoreResult<Vec<TokenId>> {
    if count == 0 {
        if bits != 0 {
            return Err(CoreError::invalid_record(
                "node",
                node_id,
                format!("inline labels field has no labels but bits {bits:#x}"),
            ));
        }
        return Ok(Vec::new());
    }
    let width = INLINE_BITS / u32::from(count);
    let used = width * u32::from(count);
    if used < u64::BITS && bits >> used != 0 {
        return Err(CoreError::invalid_record(
            "node",
            node_id,
            format!("inline labels field has bits set past {count} labels of {width} bits"),
        ));
    }

    let mask = (1u64 << width) - 1;
    let mut labels = (0..u32::from(count))
        .map(|i| {
            let label = (bits >> (width * i)) & mask;
            TokenId::try_from(label).map_err(|_| {
                CoreError::invalid_record(
                    "node",
                    node_id,
                    format!("inline label {label} does not fit a token id"),
                )
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;
    labels.sort_unstable();
    labels.dedup();
    Ok(labels)
}

/// Whether an entity with `tokens` matches a token filter.
///
/// An empty filter matches any entity that has at least one token.
#[must_use]
pub fn contains_any_token(filter: &[TokenId], tokens: &[TokenId]) -> bool {
    if filter.is_empty() {
        return !tokens.is_empty();
    }
    tokens.iter().any(|token| filter.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use recordview_codec::encode_label_array;
    use recordview_storage::InMemoryBackend;

    fn label_store() -> DynamicStore {
        DynamicStore::new("label", Box::new(InMemoryBackend::new()), 32, 100).unwrap()
    }

    #[test]
    fn empty_field() {
        assert_eq!(
            LabelsField::parse(LabelsField::EMPTY),
            LabelsField::Inline { count: 0, bits: 0 }
        );
        assert!(LabelsField::parse(0)
            .tokens(0, &label_store())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn inline_labels_come_back_sorted() {
        let raw = LabelsField::inline(&[7, 3]).unwrap();
        let field = LabelsField::parse(raw);
        assert_eq!(field, LabelsField::Inline { count: 2, bits: 3 | 7 << 30 });
        assert_eq!(field.tokens(0, &label_store()).unwrap(), vec![3, 7]);
    }

    #[test]
    fn seven_small_labels_fit() {
        let labels = [1, 2, 3, 4, 5, 6, 255];
        let raw = LabelsField::inline(&labels).unwrap();
        assert_eq!(LabelsField::parse(raw).tokens(0, &label_store()).unwrap(), labels);
    }

    #[test]
    fn too_many_or_too_wide_labels_do_not_fit() {
        assert_eq!(LabelsField::inline(&[1, 2, 3, 4, 5, 6, 7, 8]), None);
        // 7 labels get 8 bits each
        assert_eq!(LabelsField::inline(&[1, 2, 3, 4, 5, 6, 256]), None);
        assert!(LabelsField::inline(&[u32::MAX]).is_some());
    }

    #[test]
    fn dynamic_labels() {
        let store = label_store();
        let head = store.write_chain(&encode_label_array(&[40, 2, 900_000])).unwrap();
        let field = LabelsField::parse(LabelsField::dynamic(head));

        assert_eq!(field, LabelsField::Dynamic { head });
        assert_eq!(field.tokens(0, &store).unwrap(), vec![2, 40, 900_000]);
    }

    #[test]
    fn inline_label_wider_than_token_id_is_rejected() {
        let raw = 1 << COUNT_SHIFT | 1 << 33 | 5;
        let err = LabelsField::parse(raw).tokens(4, &label_store()).unwrap_err();
        assert!(err.is_corruption());
        assert!(matches!(err, CoreError::InvalidRecord { store: "node", id: 4, .. }));
    }

    #[test]
    fn inline_bits_past_last_label_are_rejected() {
        // seven labels of 8 bits leave bits 56..60 unused
        let raw = 7 << COUNT_SHIFT | 1 << 57 | 1;
        let err = LabelsField::parse(raw).tokens(2, &label_store()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecord { id: 2, .. }));

        let raw = 1 << 20;
        assert!(LabelsField::parse(raw).tokens(2, &label_store()).is_err());
    }

    #[test]
    fn dynamic_labels_with_broken_chain() {
        let field = LabelsField::parse(LabelsField::dynamic(12));
        assert!(field.tokens(0, &label_store()).unwrap_err().is_corruption());
    }

    proptest! {
        #[test]
        fn inline_field_keeps_label_set(labels in prop::collection::btree_set(0u32..256, 0..=7)) {
            let labels: Vec<TokenId> = labels.into_iter().collect();
            let raw = LabelsField::inline(&labels).unwrap();
            prop_assert_eq!(raw >> 63, 0);
            prop_assert_eq!(LabelsField::parse(raw).tokens(0, &label_store()).unwrap(), labels);
        }
    }

    #[test]
    fn token_filter() {
        assert!(contains_any_token(&[], &[1]));
        assert!(!contains_any_token(&[], &[]));
        assert!(contains_any_token(&[4, 1], &[1, 9]));
        assert!(!contains_any_token(&[4], &[1, 9]));
    }
}
