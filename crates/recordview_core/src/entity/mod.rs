//! Entity-level reads: updates, lookups and selective loads.

mod filter;
mod reader;
mod update;

pub use filter::PropertyKeyFilter;
pub use reader::{EntityReader, PropertyLoadSink};
pub use update::{EntityUpdates, EntityUpdatesBuilder, NodeLabelUpdate};
