//! Shared data types: markers, calls and the marker tree.

pub mod marker;
pub mod tree;

pub use marker::{CallMap, Marker, MarkerCall};
pub use tree::MarkerTree;
