//! Domain module for the ordered index.

pub mod errors;
pub mod invariants;
pub mod iter;
mod node;
pub mod tree;

pub use errors::*;
pub use iter::Iter;
pub use tree::OrderedIndex;
