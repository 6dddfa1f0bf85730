//! Property key filters for scans.

use crate::types::PropertyKeyId;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Selects the property keys a scan reports.
#[derive(Clone, Default)]
pub enum PropertyKeyFilter {
    /// Every key.
    #[default]
    All,
    /// Only the listed keys.
    Keys(BTreeSet<PropertyKeyId>),
    /// Keys accepted by a predicate.
    Predicate(Arc<dyn Fn(PropertyKeyId) -> bool + Send + Sync>),
}

impl PropertyKeyFilter {
    /// Filter accepting only `keys`.
    pub fn keys(keys: impl IntoIterator<Item = PropertyKeyId>) -> Self {
        Self::Keys(keys.into_iter().collect())
    }

    /// Filter accepting keys for which `f` returns true.
    pub fn predicate(f: impl Fn(PropertyKeyId) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Whether `key` passes the filter.
    #[must_use]
    pub fn accepts(&self, key: PropertyKeyId) -> bool {
        match self {
            Self::All => true,
            Self::Keys(keys) => keys.contains(&key),
            Self::Predicate(f) => f(key),
        }
    }
}

impl fmt::Debug for PropertyKeyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Keys(keys) => f.debug_tuple("Keys").field(keys).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters() {
        assert!(PropertyKeyFilter::All.accepts(99));

        let keys = PropertyKeyFilter::keys([1, 2]);
        assert!(keys.accepts(2));
        assert!(!keys.accepts(3));
        assert_eq!(format!("{keys:?}"), "Keys({1, 2})");

        let even = PropertyKeyFilter::predicate(|key| key % 2 == 0);
        assert!(even.accepts(4));
        assert!(!even.accepts(5));
    }
}
