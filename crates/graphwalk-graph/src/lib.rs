//! Graphwalk Graph Model
//!
//! The immutable-per-run graph consumed by the step-recording algorithms.
//!
//! # Direction
//!
//! Edges are always stored directed (`source -> target`). Whether a run
//! treats them as bidirectional is an [`Orientation`] chosen at call time,
//! never an attribute of the edge itself.
//!
//! # Ordering
//!
//! Node order and edge order are preserved exactly as given. Algorithms
//! break ties and expand neighbors in this order, so two runs over the
//! same graph always record the same steps.
//!
//! # Edge Lists
//!
//! Graphs are usually typed in as a plain edge list:
//!
//! ```text
//! 1 2        # unweighted edge 1 -> 2
//! 1 3 2.5    # weighted edge 1 -> 3
//! 7          # isolated node 7
//! ```
//!
//! See [`parse_edge_list`] and [`to_edge_list`].

mod edge_list;
mod error;
mod graph;
mod node;

pub use edge_list::{parse_edge_list, to_edge_list};
pub use error::{Error, Result};
pub use graph::{Adjacency, Graph, Neighbor, Orientation};
pub use node::{Edge, EdgeId, Node, NodeId};

/// Weight used by shortest-path relaxation when an edge has none.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Edge list of the graph shown before the user types anything.
pub const SAMPLE_EDGE_LIST: &str = "1 2\n1 3\n2 4\n3 4\n4 5\n2 5";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_graph_parses() {
        let graph = parse_edge_list(SAMPLE_EDGE_LIST);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.edges().iter().all(|e| e.weight.is_none()));
    }

    #[test]
    fn missing_weight_defaults_to_one() {
        let edge = Edge::new(NodeId(1), NodeId(2));
        assert_eq!(edge.cost(), DEFAULT_WEIGHT);
    }
}
