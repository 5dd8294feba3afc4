//! Dijkstra's shortest path with step recording.
//!
//! The next node to settle is found by a linear scan in graph order with a
//! strict `<`, so ties always go to the node listed first. Swapping in a
//! heap would have to keep that order to stay deterministic.

use std::collections::HashMap;

use graphwalk_graph::{Graph, NodeId, Orientation};

use crate::step::{join_ids, Outcome, Step, StepKind, Tentative, Visited};

/// Recorded run of Dijkstra's algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub steps: Vec<Step>,
    /// Empty when `end` cannot be reached from `start`.
    pub path: Vec<NodeId>,
    /// `None` when `end` cannot be reached from `start`.
    pub distance: Option<f64>,
}

impl ShortestPath {
    fn empty() -> Self {
        Self { steps: Vec::new(), path: Vec::new(), distance: None }
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::ShortestPath {
            path: self.path.clone(),
            distance: self.distance,
        }
    }
}

/// Run Dijkstra from `start` to `end`.
///
/// Missing weights count as 1. Weights are expected to be non-negative;
/// `AlgorithmRequest::validate` rejects graphs that break this.
pub fn dijkstra(graph: &Graph, orientation: Orientation, start: NodeId, end: NodeId) -> ShortestPath {
    if graph.is_empty() {
        return ShortestPath::empty();
    }

    let adjacency = graph.adjacency(orientation);
    let ids: Vec<NodeId> = graph.node_ids().collect();
    let mut distances: HashMap<NodeId, f64> = ids
        .iter()
        .map(|&id| (id, if id == start { 0.0 } else { f64::INFINITY }))
        .collect();
    let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
    let mut settled = Visited::default();
    let mut steps = Vec::new();

    steps.push(
        Step::new(
            StepKind::Initialize,
            format!("Starting Dijkstra's algorithm from node {}", start),
        )
        .with_current(graph.contains(start).then_some(start))
        .with_visited(&settled)
        .with_distances(snapshot(&ids, &distances)),
    );

    loop {
        let mut current = None;
        let mut best = f64::INFINITY;
        for &id in &ids {
            if !settled.contains(id) && distances[&id] < best {
                best = distances[&id];
                current = Some(id);
            }
        }
        // Nothing left with a finite distance
        let Some(current) = current else { break };

        settled.insert(current);
        steps.push(
            Step::new(
                StepKind::Visit,
                format!("Visiting node {} (distance: {})", current, best),
            )
            .with_current(current)
            .with_visited(&settled)
            .with_distances(snapshot(&ids, &distances)),
        );

        if current == end {
            break;
        }

        for neighbor in adjacency.neighbors(current) {
            if settled.contains(neighbor.id) {
                continue;
            }
            let Some(&old) = distances.get(&neighbor.id) else {
                continue;
            };
            let candidate = best + neighbor.cost;
            if candidate < old {
                distances.insert(neighbor.id, candidate);
                previous.insert(neighbor.id, current);
                steps.push(
                    Step::new(
                        StepKind::Update {
                            neighbor: neighbor.id,
                            old_distance: old.is_finite().then_some(old),
                            new_distance: candidate,
                        },
                        format!("Updated distance to node {}: {}", neighbor.id, candidate),
                    )
                    .with_current(current)
                    .with_visited(&settled)
                    .with_distances(snapshot(&ids, &distances)),
                );
            }
        }
    }

    let path = reconstruct(graph, &previous, start, end);
    let distance = if path.is_empty() {
        None
    } else {
        distances.get(&end).copied()
    };

    let message = match distance {
        Some(d) => format!("Shortest path found: {} (distance: {})", join_ids(&path, " → "), d),
        None => "No path found".to_string(),
    };
    let outcome = Outcome::ShortestPath { path: path.clone(), distance };
    steps.push(
        Step::new(StepKind::Complete { outcome }, message)
            .with_visited(&settled)
            .with_distances(snapshot(&ids, &distances))
            .with_path(&path),
    );

    tracing::debug!(%start, %end, steps = steps.len(), ?distance, "dijkstra recorded");

    ShortestPath { steps, path, distance }
}

/// Walk `previous` back from `end`. Valid only if the walk ends at `start`.
fn reconstruct(
    graph: &Graph,
    previous: &HashMap<NodeId, NodeId>,
    start: NodeId,
    end: NodeId,
) -> Vec<NodeId> {
    if !graph.contains(start) || !graph.contains(end) {
        return Vec::new();
    }

    let mut path = vec![end];
    let mut cursor = end;
    while let Some(&prev) = previous.get(&cursor) {
        path.push(prev);
        cursor = prev;
    }
    path.reverse();

    if path.first() == Some(&start) {
        path
    } else {
        Vec::new()
    }
}

fn snapshot(ids: &[NodeId], distances: &HashMap<NodeId, f64>) -> Vec<Tentative> {
    ids.iter()
        .map(|&node| Tentative {
            node,
            distance: distances.get(&node).copied().filter(|d| d.is_finite()),
        })
        .collect()
}
