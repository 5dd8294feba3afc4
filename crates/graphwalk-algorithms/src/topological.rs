//! Topological sort by DFS post-order with three-coloring.
//!
//! Nodes are unvisited (no mark), in progress, or finished. Reaching an
//! in-progress node means the graph has a cycle and the whole sort fails;
//! no partial ordering is reported.
//!
//! The walk uses an explicit frame stack instead of recursion. Steps come
//! out in the same order as the recursive formulation: `visit` on entry,
//! children in edge-list order, `finish` on exit.

use std::collections::HashMap;

use graphwalk_graph::{Graph, NodeId, Orientation};

use crate::step::{join_ids, Outcome, Step, StepKind, Visited};

/// Recorded run of a topological sort.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologicalOrder {
    pub steps: Vec<Step>,
    /// Empty whenever `has_cycle` is set.
    pub order: Vec<NodeId>,
    pub has_cycle: bool,
}

impl TopologicalOrder {
    pub fn outcome(&self) -> Outcome {
        Outcome::Ordering {
            order: self.order.clone(),
            has_cycle: self.has_cycle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Finished,
}

struct Walk {
    marks: HashMap<NodeId, Mark>,
    visited: Visited,
    in_progress: Vec<NodeId>,
    finished: Vec<NodeId>,
    steps: Vec<Step>,
}

impl Walk {
    fn step(&self, kind: StepKind, message: String) -> Step {
        Step::new(kind, message)
            .with_visited(&self.visited)
            .with_progress(&self.in_progress, &self.finished)
    }

    fn enter(&mut self, node: NodeId) {
        self.marks.insert(node, Mark::InProgress);
        self.visited.insert(node);
        self.in_progress.push(node);
        let step = self
            .step(StepKind::Visit, format!("Visiting node {}", node))
            .with_current(node);
        self.steps.push(step);
    }

    fn leave(&mut self, node: NodeId) {
        self.marks.insert(node, Mark::Finished);
        self.in_progress.retain(|&n| n != node);
        self.finished.push(node);
        let step = self
            .step(StepKind::Finish, format!("Finished processing node {}", node))
            .with_current(node);
        self.steps.push(step);
    }
}

/// Sort the graph topologically. Edges are always read as directed.
pub fn topological_sort(graph: &Graph) -> TopologicalOrder {
    if graph.is_empty() {
        return TopologicalOrder {
            steps: Vec::new(),
            order: Vec::new(),
            has_cycle: false,
        };
    }

    let adjacency = graph.adjacency(Orientation::Directed);
    let mut walk = Walk {
        marks: HashMap::with_capacity(graph.node_count()),
        visited: Visited::default(),
        in_progress: Vec::new(),
        finished: Vec::new(),
        steps: Vec::new(),
    };

    let init = walk.step(StepKind::Initialize, "Starting topological sort".to_string());
    walk.steps.push(init);

    for root in graph.node_ids() {
        if walk.marks.contains_key(&root) {
            continue;
        }

        // (node, index of the next neighbor to look at)
        let mut frames: Vec<(NodeId, usize)> = vec![(root, 0)];
        walk.enter(root);

        while let Some(&(node, next)) = frames.last() {
            let Some(neighbor) = adjacency.neighbors(node).get(next).map(|n| n.id) else {
                frames.pop();
                walk.leave(node);
                continue;
            };
            if let Some(top) = frames.last_mut() {
                top.1 += 1;
            }

            match walk.marks.get(&neighbor).copied() {
                Some(Mark::InProgress) => {
                    let step = walk
                        .step(
                            StepKind::Cycle { node: neighbor },
                            format!(
                                "Cycle detected at node {} - Topological sort not possible",
                                neighbor
                            ),
                        )
                        .with_current(node);
                    walk.steps.push(step);
                    tracing::debug!(%neighbor, steps = walk.steps.len(), "topological sort found cycle");
                    return TopologicalOrder {
                        steps: walk.steps,
                        order: Vec::new(),
                        has_cycle: true,
                    };
                }
                Some(Mark::Finished) => {}
                None => {
                    walk.enter(neighbor);
                    frames.push((neighbor, 0));
                }
            }
        }
    }

    let order: Vec<NodeId> = walk.finished.iter().rev().copied().collect();
    let complete = walk.step(
        StepKind::Complete {
            outcome: Outcome::Ordering {
                order: order.clone(),
                has_cycle: false,
            },
        },
        format!("Topological sort completed: {}", join_ids(&order, " → ")),
    );
    walk.steps.push(complete);

    tracing::debug!(steps = walk.steps.len(), nodes = order.len(), "topological sort recorded");

    TopologicalOrder {
        steps: walk.steps,
        order,
        has_cycle: false,
    }
}

/// True when the directed graph has no cycle.
pub fn is_acyclic(graph: &Graph) -> bool {
    !topological_sort(graph).has_cycle
}
