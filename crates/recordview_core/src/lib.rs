//! # RecordView Core
//!
//! Index store views over the record stores of a property graph.
//!
//! This crate provides:
//! - Fixed-size record stores for nodes, relationships and properties, plus
//!   dynamic stores for strings, arrays and large label sets
//! - Property chain walking with cycle and length guards
//! - Entity updates, property lookups and selective property loads
//! - Node and relationship store scans with stop and progress support
//! - Index store views, a label index and index counters
//!
//! ## Usage
//!
//! ```
//! use recordview_core::{
//!     Config, EntityUpdates, IndexStoreView, InMemoryCountsStore, NoLockService,
//!     PropertyKeyFilter, RecordIndexStoreView, Stores,
//! };
//! use std::sync::Arc;
//!
//! let stores = Arc::new(Stores::in_memory(Config::default()).unwrap());
//! let view = RecordIndexStoreView::new(
//!     stores,
//!     Arc::new(NoLockService),
//!     Arc::new(InMemoryCountsStore::new()),
//! );
//!
//! let mut updates = Vec::new();
//! let mut scan = view.visit_nodes(
//!     &[],
//!     PropertyKeyFilter::All,
//!     Some(Box::new(|update: EntityUpdates| -> recordview_core::CoreResult<bool> {
//!         updates.push(update);
//!         Ok(false)
//!     })),
//!     None,
//!     false,
//! );
//! scan.run().unwrap();
//! drop(scan);
//! assert!(updates.is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod counts;
mod entity;
mod error;
mod labels;
mod locks;
mod property;
mod record;
mod scan;
mod stats;
mod store;
mod types;
mod view;

pub use config::Config;
pub use counts::{CountsStore, DoubleLong, InMemoryCountsStore};
pub use entity::{
    EntityReader, EntityUpdates, EntityUpdatesBuilder, NodeLabelUpdate, PropertyKeyFilter,
    PropertyLoadSink,
};
pub use error::{CoreError, CoreResult};
pub use labels::{contains_any_token, LabelsField, MAX_INLINE_LABELS};
pub use locks::{EntityLock, LockService, NoLockService, StripedLockService};
pub use property::PropertyChain;
pub use record::{
    DynamicRecord, NodeRecord, PrimitiveRecord, PropertyBlock, PropertyRecord, Record,
    RecordFlags, RelationshipRecord, PROPERTY_SLOTS,
};
pub use scan::{
    BoxedVisitor, NodeStoreScan, PopulationProgress, RelationshipStoreScan, ScanProgressHandle,
    ScanStopHandle, StoreScan, Visitor,
};
pub use stats::{ScanStats, ScanStatsSnapshot};
pub use store::{DynamicStore, RecordLoad, RecordStore, StoreBackends, Stores};
pub use types::{
    id_from_raw, id_to_raw, EntityType, IndexId, PropertyKeyId, TokenId, MAX_RECORD_ID, NO_ID,
};
pub use view::{
    IndexStoreView, InMemoryLabelIndex, LabelIndexedStoreView, LabelScanReader,
    RecordIndexStoreView,
};

pub use recordview_codec::{ArrayValue, PropertyType, Value};
