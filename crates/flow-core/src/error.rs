//! Graph model error types.

use crate::id::{EdgeId, NodeId};
use thiserror::Error;

/// Errors returned by graph model operations that reference missing items.
///
/// Behaviors never surface these to the user; the editor engine logs them
/// and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("unknown edge: {0}")]
    UnknownEdge(EdgeId),

    /// An anchor index past the end of the node's anchor points.
    #[error("anchor {index} out of range for {node} ({count} anchors)")]
    AnchorOutOfRange {
        node: NodeId,
        index: usize,
        count: usize,
    },

    #[error("node already exists: {0}")]
    DuplicateNode(NodeId),

    #[error("edge already exists: {0}")]
    DuplicateEdge(EdgeId),

    /// A state name the host sent that maps to no known flag.
    #[error("unknown item state: {0:?}")]
    UnknownState(String),
}
