//! Depth-first and breadth-first search with step recording.
//!
//! Both share one loop and differ only in which end of the frontier they
//! take from. Neighbors are expanded in edge-list order; DFS pushes them in
//! reverse so the first listed neighbor is popped first.

use std::collections::VecDeque;

use graphwalk_graph::{Graph, NodeId, Orientation};

use crate::step::{join_ids, Frontier, Outcome, Step, StepKind, Visited};

/// Recorded run of DFS or BFS.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    pub steps: Vec<Step>,
    /// Nodes in visiting order.
    pub path: Vec<NodeId>,
    /// Whether the target was reached; true when no target was given.
    pub found: bool,
    pub target: Option<NodeId>,
}

impl Traversal {
    pub fn outcome(&self) -> Outcome {
        Outcome::Traversal {
            path: self.path.clone(),
            found: self.found,
            target: self.target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Discipline {
    Stack,
    Queue,
}

impl Discipline {
    fn label(self) -> &'static str {
        match self {
            Discipline::Stack => "DFS",
            Discipline::Queue => "BFS",
        }
    }

    fn container(self) -> &'static str {
        match self {
            Discipline::Stack => "stack",
            Discipline::Queue => "queue",
        }
    }

    fn take(self, frontier: &mut VecDeque<NodeId>) -> Option<NodeId> {
        match self {
            Discipline::Stack => frontier.pop_back(),
            Discipline::Queue => frontier.pop_front(),
        }
    }

    fn snapshot(self, frontier: &VecDeque<NodeId>) -> Frontier {
        let nodes = frontier.iter().copied().collect();
        match self {
            Discipline::Stack => Frontier::Stack(nodes),
            Discipline::Queue => Frontier::Queue(nodes),
        }
    }
}

/// Depth-first search from `start`, stopping early at `target` if given.
pub fn dfs(graph: &Graph, orientation: Orientation, start: NodeId, target: Option<NodeId>) -> Traversal {
    traverse(graph, orientation, start, target, Discipline::Stack)
}

/// Breadth-first search from `start`, stopping early at `target` if given.
pub fn bfs(graph: &Graph, orientation: Orientation, start: NodeId, target: Option<NodeId>) -> Traversal {
    traverse(graph, orientation, start, target, Discipline::Queue)
}

fn traverse(
    graph: &Graph,
    orientation: Orientation,
    start: NodeId,
    target: Option<NodeId>,
    discipline: Discipline,
) -> Traversal {
    if graph.is_empty() {
        return Traversal {
            steps: Vec::new(),
            path: Vec::new(),
            found: target.is_none(),
            target,
        };
    }

    let label = discipline.label();
    let adjacency = graph.adjacency(orientation);
    let mut visited = Visited::default();
    let mut path: Vec<NodeId> = Vec::new();
    let mut frontier: VecDeque<NodeId> = VecDeque::new();
    if graph.contains(start) {
        frontier.push_back(start);
    }
    let mut steps = Vec::new();

    let searching = target
        .map(|t| format!(" searching for {}", t))
        .unwrap_or_default();
    steps.push(
        Step::new(
            StepKind::Initialize,
            format!("Starting {} from node {}{}", label, start, searching),
        )
        .with_visited(&visited)
        .with_frontier(discipline.snapshot(&frontier))
        .with_path(&path),
    );

    while let Some(current) = discipline.take(&mut frontier) {
        if !visited.insert(current) {
            continue;
        }
        path.push(current);

        steps.push(
            Step::new(StepKind::Visit, format!("Visiting node {}", current))
                .with_current(current)
                .with_visited(&visited)
                .with_frontier(discipline.snapshot(&frontier))
                .with_path(&path),
        );

        if target == Some(current) {
            steps.push(
                Step::new(
                    StepKind::Found { target: current },
                    format!("Target node {} found!", current),
                )
                .with_current(current)
                .with_visited(&visited)
                .with_frontier(discipline.snapshot(&frontier))
                .with_path(&path),
            );
            break;
        }

        let mut neighbors: Vec<NodeId> = Vec::new();
        for id in adjacency.neighbor_ids(current) {
            let queued = discipline == Discipline::Queue && frontier.contains(&id);
            if !visited.contains(id) && !queued && !neighbors.contains(&id) {
                neighbors.push(id);
            }
        }
        if discipline == Discipline::Stack {
            neighbors.reverse();
        }
        frontier.extend(neighbors.iter().copied());

        steps.push(
            Step::new(
                StepKind::Expand { neighbors: neighbors.clone() },
                format!(
                    "Added neighbors of {} to {}: {}",
                    current,
                    discipline.container(),
                    join_ids(&neighbors, ", ")
                ),
            )
            .with_current(current)
            .with_visited(&visited)
            .with_frontier(discipline.snapshot(&frontier))
            .with_path(&path),
        );
    }

    let found = target.map_or(true, |t| visited.contains(t));
    let message = match target {
        None => format!("{} traversal completed", label),
        Some(t) if found => format!("{} completed - Target {} found!", label, t),
        Some(t) => format!("{} completed - Target {} not found", label, t),
    };
    steps.push(
        Step::new(
            StepKind::Complete {
                outcome: Outcome::Traversal { path: path.clone(), found, target },
            },
            message,
        )
        .with_visited(&visited)
        .with_frontier(discipline.snapshot(&frontier))
        .with_path(&path),
    );

    tracing::debug!(
        algorithm = label,
        %start,
        steps = steps.len(),
        visited = visited.len(),
        found,
        "traversal recorded"
    );

    Traversal { steps, path, found, target }
}
