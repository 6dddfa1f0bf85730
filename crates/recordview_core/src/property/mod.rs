//! Property chains and property values.

mod chain;
mod value;

pub use chain::PropertyChain;
