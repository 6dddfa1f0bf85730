//! Record stores.
//!
//! A [`RecordStore`] maps record ids to fixed-size slots of a
//! [`StorageBackend`](recordview_storage::StorageBackend). Reads decode into
//! a caller-owned record so scans can reuse one instance for every id.

mod dynamic;
mod record_store;
mod stores;

pub use dynamic::DynamicStore;
pub use record_store::{RecordLoad, RecordStore};
pub use stores::{StoreBackends, Stores};
