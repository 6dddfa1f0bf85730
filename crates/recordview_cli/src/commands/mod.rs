//! CLI command implementations.

pub mod info;
pub mod lookup;
pub mod scan;
pub mod verify;

use recordview_core::{Config, CoreResult, Stores};
use std::path::Path;

/// Opens existing stores read-only in spirit: nothing is created.
pub fn open_stores(path: &Path) -> CoreResult<Stores> {
    Stores::open(path, Config::default().create_if_missing(false))
}
