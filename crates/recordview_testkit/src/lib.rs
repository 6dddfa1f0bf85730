//! # RecordView Testkit
//!
//! Test utilities for RecordView.
//!
//! This crate provides:
//! - Store fixtures that write nodes, relationships, property chains and
//!   labels the way a writer would lay them out
//! - Property-based test generators using proptest
//! - A small sample graph shared by scenario tests
//!
//! ## Usage
//!
//! ```rust
//! use recordview_testkit::prelude::*;
//!
//! let stores = TestStores::memory();
//! let node = stores.node(&[3, 7], &[(1, Value::from("a"))]);
//!
//! let update = stores.view().node_as_updates(node).unwrap().unwrap();
//! assert_eq!(update.tokens(), &[3, 7]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use recordview_core::{
        EntityUpdates, IndexStoreView, NodeLabelUpdate, PropertyKeyFilter, StoreScan, Value,
    };
}

pub use fixtures::*;
pub use generators::*;
