//! Step-Recording Graph Algorithms
//!
//! Each algorithm runs to completion immediately and returns the full list
//! of [`Step`]s it took. Nothing is animated here: playback walks the list
//! later, at whatever pace it likes, forwards or backwards.
//!
//! # Algorithms
//!
//! - [`dijkstra`]: shortest path, ties broken by node order
//! - [`dfs`] / [`bfs`]: traversal with optional early stop at a target
//! - [`topological_sort`]: DFS post-order with cycle detection
//!
//! # Determinism
//!
//! Same graph, same request, same steps. Every choice between equals is
//! resolved by node order or edge-list order, never by hash order.
//!
//! # Step Shape
//!
//! The last step of a finished run is always `complete` and carries the
//! [`Outcome`]. A topological sort that hits a cycle is the one exception:
//! it ends on the `cycle` step.

mod components;
mod dijkstra;
mod error;
mod request;
mod step;
mod topological;
mod traversal;

pub use components::connected_components;
pub use dijkstra::{dijkstra, ShortestPath};
pub use error::{Error, Result};
pub use request::{run, Algorithm, AlgorithmRequest, Run};
pub use step::{Frontier, Outcome, Step, StepKind, Tentative, Visited};
pub use topological::{is_acyclic, topological_sort, TopologicalOrder};
pub use traversal::{bfs, dfs, Traversal};
