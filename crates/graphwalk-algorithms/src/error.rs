//! Error types for graphwalk-algorithms.
//!
//! These are user-input errors caught before a run. The algorithms
//! themselves never fail.

use graphwalk_graph::NodeId;
use thiserror::Error;

use crate::Algorithm;

/// Result type for request validation.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a run request is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The algorithm needs a start node and none was selected.
    #[error("{0} needs a start node")]
    MissingStart(Algorithm),

    /// Shortest path needs an end node and none was selected.
    #[error("{0} needs an end node")]
    MissingEnd(Algorithm),

    /// A selected node is not part of the graph.
    #[error("node {0} is not in the graph")]
    UnknownNode(NodeId),

    /// Shortest path relaxation assumes non-negative weights.
    #[error("edge {from}-{to} has negative weight {weight}")]
    NegativeWeight { from: NodeId, to: NodeId, weight: f64 },

    /// Topological order is only defined for directed graphs.
    #[error("topological sort needs a directed graph")]
    UndirectedOrdering,

    /// The algorithm name is not recognised.
    #[error("unknown algorithm {0:?}")]
    UnknownAlgorithm(String),
}
