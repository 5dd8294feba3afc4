//! Step records: replayable snapshots of algorithm progress.
//!
//! Every step owns full copies of the collections it reports. Later steps
//! never alias earlier ones, so any prefix of a recording stays valid.

use std::collections::HashSet;

use graphwalk_graph::NodeId;
use serde::{Deserialize, Serialize};

/// What happened in a step, with the data specific to that event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// The run has been set up; nothing processed yet
    Initialize,

    /// A node was taken off the frontier and marked visited
    Visit,

    /// A shortest-path relaxation strictly improved a distance
    Update {
        neighbor: NodeId,
        old_distance: Option<f64>,
        new_distance: f64,
    },

    /// Unvisited neighbors were pushed onto the frontier
    Expand { neighbors: Vec<NodeId> },

    /// The search target was reached
    Found { target: NodeId },

    /// A node and all of its descendants are done (topological sort)
    Finish,

    /// An edge closed a cycle (topological sort)
    Cycle { node: NodeId },

    /// The run is over
    Complete { outcome: Outcome },
}

/// Final result of a run, as carried by the `complete` step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Dijkstra. `distance` is `None` when `end` is unreachable.
    ShortestPath {
        path: Vec<NodeId>,
        distance: Option<f64>,
    },
    /// DFS or BFS. `found` is true for a full traversal without target.
    Traversal {
        path: Vec<NodeId>,
        found: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<NodeId>,
    },
    /// Topological sort. `order` is empty whenever `has_cycle` is set.
    Ordering { order: Vec<NodeId>, has_cycle: bool },
}

/// Pending nodes of a DFS or BFS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frontier {
    /// Top of the stack is the last element
    Stack(Vec<NodeId>),
    /// Head of the queue is the first element
    Queue(Vec<NodeId>),
}

impl Frontier {
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Frontier::Stack(nodes) | Frontier::Queue(nodes) => nodes,
        }
    }
}

/// Tentative distance of one node. `None` stands for infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tentative {
    pub node: NodeId,
    pub distance: Option<f64>,
}

/// One discrete, replayable snapshot of algorithm progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub kind: StepKind,
    /// Node being processed, if any
    pub current: Option<NodeId>,
    /// Visited nodes in visiting order
    pub visited: Vec<NodeId>,
    /// Dijkstra tentative distances, in graph order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<Tentative>>,
    /// DFS stack or BFS queue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontier: Option<Frontier>,
    /// Traversal order so far, or the final shortest path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<NodeId>>,
    /// Topological sort: nodes entered but not finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<Vec<NodeId>>,
    /// Topological sort: nodes in finishing order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<Vec<NodeId>>,
    pub message: String,
}

impl Step {
    pub fn new(kind: StepKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            current: None,
            visited: Vec::new(),
            distances: None,
            frontier: None,
            path: None,
            in_progress: None,
            finished: None,
            message: message.into(),
        }
    }

    pub fn with_current(mut self, current: impl Into<Option<NodeId>>) -> Self {
        self.current = current.into();
        self
    }

    pub fn with_visited(mut self, visited: &Visited) -> Self {
        self.visited = visited.order().to_vec();
        self
    }

    pub fn with_distances(mut self, distances: Vec<Tentative>) -> Self {
        self.distances = Some(distances);
        self
    }

    pub fn with_frontier(mut self, frontier: Frontier) -> Self {
        self.frontier = Some(frontier);
        self
    }

    pub fn with_path(mut self, path: &[NodeId]) -> Self {
        self.path = Some(path.to_vec());
        self
    }

    pub fn with_progress(mut self, in_progress: &[NodeId], finished: &[NodeId]) -> Self {
        self.in_progress = Some(in_progress.to_vec());
        self.finished = Some(finished.to_vec());
        self
    }

    /// Short name of the step kind, as used on the wire.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            StepKind::Initialize => "initialize",
            StepKind::Visit => "visit",
            StepKind::Update { .. } => "update",
            StepKind::Expand { .. } => "expand",
            StepKind::Found { .. } => "found",
            StepKind::Finish => "finish",
            StepKind::Cycle { .. } => "cycle",
            StepKind::Complete { .. } => "complete",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.kind, StepKind::Complete { .. })
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.kind {
            StepKind::Complete { outcome } => Some(outcome),
            _ => None,
        }
    }
}

/// Visited set that remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct Visited {
    seen: HashSet<NodeId>,
    order: Vec<NodeId>,
}

impl Visited {
    /// Mark a node visited. Returns false if it already was.
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.seen.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }

    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Join node ids for step messages: `1 → 2 → 5`.
pub(crate) fn join_ids(ids: &[NodeId], separator: &str) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visited_keeps_first_insertion() {
        let mut visited = Visited::default();
        assert!(visited.insert(NodeId(3)));
        assert!(visited.insert(NodeId(1)));
        assert!(!visited.insert(NodeId(3)));
        assert_eq!(visited.order(), &[NodeId(3), NodeId(1)]);
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn step_snapshots_do_not_alias() {
        let mut visited = Visited::default();
        visited.insert(NodeId(1));
        let first = Step::new(StepKind::Visit, "one").with_visited(&visited);
        visited.insert(NodeId(2));
        let second = Step::new(StepKind::Visit, "two").with_visited(&visited);

        assert_eq!(first.visited, vec![NodeId(1)]);
        assert_eq!(second.visited, vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn step_serializes_with_type_tag() {
        let step = Step::new(StepKind::Cycle { node: NodeId(7) }, "cycle at 7")
            .with_current(NodeId(3));
        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains(r#""type":"cycle""#));
        assert!(json.contains(r#""node":7"#));
        assert!(!json.contains("distances"));

        let parsed: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, step);
    }

    #[test]
    fn complete_step_exposes_outcome() {
        let outcome = Outcome::Traversal { path: vec![NodeId(1)], found: true, target: None };
        let step = Step::new(StepKind::Complete { outcome: outcome.clone() }, "done");
        assert!(step.is_complete());
        assert_eq!(step.kind_name(), "complete");
        assert_eq!(step.outcome(), Some(&outcome));
    }

    #[test]
    fn join_uses_separator() {
        assert_eq!(join_ids(&[NodeId(1), NodeId(2), NodeId(5)], " → "), "1 → 2 → 5");
        assert_eq!(join_ids(&[], ", "), "");
    }
}
