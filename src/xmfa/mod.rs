//! XMFA alignment interpretation: block parsing and allele calling.
//!
//! progressiveMauve emits one XMFA file per reference/query pair. Blocks are
//! separated by `=` lines; each sequence in a block carries a
//! `> seqid:start-end strand [path]` header followed by the aligned rows.
//! This module turns such a file plus a marker table into a [`CallMap`].
//!
//! [`CallMap`]: crate::model::CallMap

pub mod block;
pub mod scan;

pub use block::{parse_block, parse_header, split_blocks, AlignmentBlock, BlockHeader, Strand};
pub use scan::{call_marker, complement, extract_calls};
