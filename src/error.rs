//! Error taxonomy for the typing core.
//!
//! Parsing and classification failures that callers can react to are typed
//! here; the binary surface wraps everything else in `anyhow`. A marker that
//! is simply missing from the call map is a warning carried in the results,
//! not an error variant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TyperError {
    /// A symbol outside the IUPAC+gap alphabet turned up while complementing
    /// a target base.
    #[error("invalid base '{0}' in alignment")]
    InvalidBase(char),

    /// An alignment block header could not be parsed.
    #[error("malformed alignment block header: {0}")]
    MalformedAlignment(String),

    /// The marker list for a reference strain was empty. Classification
    /// against zero markers is meaningless, so this is fatal for that
    /// reference rather than an empty result.
    #[error("no markers registered for reference strain '{0}'")]
    NoMarkers(String),

    /// The marker tree violates its structural contract (several rootless
    /// nodes, or a cycle discovered during descent).
    #[error("malformed marker tree: {0}")]
    MalformedTree(String),

    /// No node qualifies as the tree root.
    #[error("marker tree has no root node")]
    NoRoot,
}
