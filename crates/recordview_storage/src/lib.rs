//! # RecordView Storage
//!
//! Byte storage backends underneath the RecordView record stores.
//!
//! Backends are **opaque byte stores** addressed by offset. They know
//! nothing about record sizes, in-use flags or property chains; the record
//! stores in `recordview_core` own all format interpretation.
//!
//! ## Design Principles
//!
//! - Positional reads into caller-owned buffers, so record reads can reuse
//!   a scratch buffer
//! - Positional writes that zero-fill any gap, so fixed-size slots can be
//!   placed at `id * record_size`
//! - Must be `Send + Sync`; writes go through `&self` with internal locking
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - For store files on disk
//!
//! ## Example
//!
//! ```rust
//! use recordview_storage::{StorageBackend, InMemoryBackend};
//!
//! let backend = InMemoryBackend::new();
//! backend.write_at(4, b"slot").unwrap();
//! let mut buf = [0u8; 8];
//! backend.read_at(0, &mut buf).unwrap();
//! assert_eq!(&buf, b"\0\0\0\0slot");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
