//! Error types for graph construction.

use thiserror::Error;

use crate::NodeId;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling a [`Graph`](crate::Graph) or reading ids.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two nodes share an id.
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// An edge references a node that was never declared.
    #[error("edge {from}-{to} references unknown node {missing}")]
    UnknownEndpoint {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    /// A string that is not a `source-target` edge id.
    #[error("invalid edge id {0:?}")]
    InvalidEdgeId(String),
}
