//! DOM error types.

use thiserror::Error;

use crate::NodeId;

/// Errors returned by element operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node was removed from the document (or never existed).
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The operation needs a parent but the node is not attached.
    #[error("node {0} is detached")]
    Detached(NodeId),

    /// Appending would make a node its own ancestor.
    #[error("cannot move node {child} into its descendant {parent}")]
    Cycle {
        /// Node being moved.
        child: NodeId,
        /// Target parent.
        parent: NodeId,
    },
}
