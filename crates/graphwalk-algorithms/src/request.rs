//! Algorithm selection, input validation and dispatch.

use std::fmt;
use std::str::FromStr;

use graphwalk_graph::{Graph, NodeId, Orientation};
use serde::{Deserialize, Serialize};

use crate::dijkstra::dijkstra;
use crate::error::{Error, Result};
use crate::step::{Outcome, Step};
use crate::topological::topological_sort;
use crate::traversal::{bfs, dfs};

/// Identity of an algorithm. Also keys the color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Dijkstra,
    Dfs,
    Bfs,
    #[serde(alias = "topological_sort")]
    Topological,
}

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dijkstra,
        Algorithm::Dfs,
        Algorithm::Bfs,
        Algorithm::Topological,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Dfs => "dfs",
            Algorithm::Bfs => "bfs",
            Algorithm::Topological => "topological",
        }
    }

    pub const fn needs_start(&self) -> bool {
        !matches!(self, Algorithm::Topological)
    }

    pub const fn needs_end(&self) -> bool {
        matches!(self, Algorithm::Dijkstra)
    }

    pub const fn accepts_target(&self) -> bool {
        matches!(self, Algorithm::Dfs | Algorithm::Bfs)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dijkstra" | "shortest_path" => Ok(Algorithm::Dijkstra),
            "dfs" => Ok(Algorithm::Dfs),
            "bfs" => Ok(Algorithm::Bfs),
            "topological" | "topological_sort" => Ok(Algorithm::Topological),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Everything needed to start one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRequest {
    pub algorithm: Algorithm,
    pub orientation: Orientation,
    #[serde(default)]
    pub start: Option<NodeId>,
    /// Dijkstra only
    #[serde(default)]
    pub end: Option<NodeId>,
    /// DFS and BFS only; `None` means full traversal
    #[serde(default)]
    pub target: Option<NodeId>,
}

impl AlgorithmRequest {
    pub fn new(algorithm: Algorithm, orientation: Orientation) -> Self {
        Self {
            algorithm,
            orientation,
            start: None,
            end: None,
            target: None,
        }
    }

    pub fn start(mut self, id: NodeId) -> Self {
        self.start = Some(id);
        self
    }

    pub fn end(mut self, id: NodeId) -> Self {
        self.end = Some(id);
        self
    }

    pub fn target(mut self, id: NodeId) -> Self {
        self.target = Some(id);
        self
    }

    /// Check node selections against the graph before running.
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        let algorithm = self.algorithm;

        if algorithm.needs_start() {
            let start = self.start.ok_or(Error::MissingStart(algorithm))?;
            require_node(graph, start)?;
        }

        if algorithm.needs_end() {
            let end = self.end.ok_or(Error::MissingEnd(algorithm))?;
            require_node(graph, end)?;

            if let Some(edge) = graph.edges().iter().find(|e| e.cost() < 0.0) {
                return Err(Error::NegativeWeight {
                    from: edge.source,
                    to: edge.target,
                    weight: edge.cost(),
                });
            }
        }

        if algorithm.accepts_target() {
            if let Some(target) = self.target {
                require_node(graph, target)?;
            }
        }

        if algorithm == Algorithm::Topological && !self.orientation.is_directed() {
            return Err(Error::UndirectedOrdering);
        }

        Ok(())
    }

    /// Validate, then run.
    pub fn execute(&self, graph: &Graph) -> Result<Run> {
        self.validate(graph)?;
        Ok(run(graph, self))
    }
}

fn require_node(graph: &Graph, id: NodeId) -> Result<()> {
    if graph.contains(id) {
        Ok(())
    } else {
        Err(Error::UnknownNode(id))
    }
}

/// Steps and final result of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub algorithm: Algorithm,
    pub steps: Vec<Step>,
    pub outcome: Outcome,
}

impl Run {
    /// A run that never started because a required node was not selected.
    fn unstarted(request: &AlgorithmRequest) -> Self {
        let outcome = match request.algorithm {
            Algorithm::Dijkstra => Outcome::ShortestPath { path: Vec::new(), distance: None },
            Algorithm::Dfs | Algorithm::Bfs => Outcome::Traversal {
                path: Vec::new(),
                found: request.target.is_none(),
                target: request.target,
            },
            Algorithm::Topological => Outcome::Ordering { order: Vec::new(), has_cycle: false },
        };
        Self {
            algorithm: request.algorithm,
            steps: Vec::new(),
            outcome,
        }
    }
}

/// Run the requested algorithm without validating it.
///
/// Unknown or missing nodes degrade to an empty or trivial run.
pub fn run(graph: &Graph, request: &AlgorithmRequest) -> Run {
    let algorithm = request.algorithm;
    let orientation = request.orientation;

    let run = match (algorithm, request.start, request.end) {
        (Algorithm::Dijkstra, Some(start), Some(end)) => {
            let result = dijkstra(graph, orientation, start, end);
            let outcome = result.outcome();
            Run { algorithm, steps: result.steps, outcome }
        }
        (Algorithm::Dfs, Some(start), _) => {
            let result = dfs(graph, orientation, start, request.target);
            let outcome = result.outcome();
            Run { algorithm, steps: result.steps, outcome }
        }
        (Algorithm::Bfs, Some(start), _) => {
            let result = bfs(graph, orientation, start, request.target);
            let outcome = result.outcome();
            Run { algorithm, steps: result.steps, outcome }
        }
        (Algorithm::Topological, _, _) => {
            let result = topological_sort(graph);
            let outcome = result.outcome();
            Run { algorithm, steps: result.steps, outcome }
        }
        _ => Run::unstarted(request),
    };

    tracing::debug!(%algorithm, steps = run.steps.len(), "run recorded");
    run
}
