//! Error types for the editor

use thiserror::Error;
use tribune_model::NodeType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A descriptor without a matching editing-state entry. Guarded
    /// against by construction; surfacing it means a boundary was
    /// bypassed.
    #[error("no editing state for field {id} ({node_type})")]
    MissingContent { id: String, node_type: NodeType },

    /// The wire document carries a node type this editor cannot host.
    #[error("unsupported node type in wire document at index {0}")]
    UnsupportedNodeType(usize),
}
