//! Projection of a step onto node and edge styles.
//!
//! Every update is a full repaint: styles set by earlier steps go back to
//! neutral before the new step is applied, so jumping backwards renders the
//! same picture as stepping forwards to that index.

use std::collections::{BTreeMap, BTreeSet};

use graphwalk_algorithms::{Algorithm, Outcome, Step, StepKind};
use graphwalk_graph::{EdgeId, Graph, NodeId};
use serde::Serialize;

/// Fill and stroke of one color tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub fill: &'static str,
    pub stroke: &'static str,
}

impl Tier {
    const fn new(fill: &'static str, stroke: &'static str) -> Self {
        Self { fill, stroke }
    }
}

/// Target reached by DFS or BFS.
pub const FOUND: Tier = Tier::new("#4caf50", "#388e3c");

/// Node that closed a cycle during topological sort.
pub const CYCLE: Tier = Tier::new("#f44336", "#d32f2f");

/// Per-algorithm colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub visited: Tier,
    pub active: Tier,
    #[serde(rename = "final")]
    pub done: Tier,
}

impl Palette {
    pub const fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Dijkstra => Self {
                visited: Tier::new("#e8f5e8", "#4caf50"),
                active: Tier::new("#2196f3", "#1976d2"),
                done: Tier::new("#ff9800", "#f57c00"),
            },
            Algorithm::Dfs => Self {
                visited: Tier::new("#e3f2fd", "#2196f3"),
                active: Tier::new("#2196f3", "#1976d2"),
                done: FOUND,
            },
            Algorithm::Bfs => Self {
                visited: Tier::new("#f3e5f5", "#9c27b0"),
                active: Tier::new("#9c27b0", "#7b1fa2"),
                done: FOUND,
            },
            Algorithm::Topological => Self {
                visited: Tier::new("#fff3e0", "#ff9800"),
                active: Tier::new("#ff9800", "#f57c00"),
                done: FOUND,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStyle {
    pub color: &'static str,
    pub stroke: &'static str,
    pub size: f64,
    pub highlighted: bool,
    pub text: &'static str,
}

impl NodeStyle {
    pub const NEUTRAL: NodeStyle = NodeStyle {
        color: "#fff",
        stroke: "#666",
        size: 20.0,
        highlighted: false,
        text: "#333",
    };

    fn visited(tier: Tier) -> Self {
        Self {
            color: tier.fill,
            stroke: tier.stroke,
            highlighted: true,
            ..Self::NEUTRAL
        }
    }

    /// Active, final, found and cycle tiers use white labels.
    fn emphasized(tier: Tier) -> Self {
        Self {
            text: "#fff",
            ..Self::visited(tier)
        }
    }
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub color: &'static str,
    pub width: f64,
    pub highlighted: bool,
    pub animated: bool,
}

impl EdgeStyle {
    pub const NEUTRAL: EdgeStyle = EdgeStyle {
        color: "#999",
        width: 2.0,
        highlighted: false,
        animated: false,
    };

    fn animated(tier: Tier) -> Self {
        Self {
            color: tier.fill,
            animated: true,
            ..Self::NEUTRAL
        }
    }

    fn highlighted(tier: Tier) -> Self {
        Self {
            color: tier.fill,
            width: 4.0,
            highlighted: true,
            ..Self::NEUTRAL
        }
    }
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Fields that describe the run rather than single elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalState {
    pub highlighted_path: Vec<NodeId>,
    pub visited_nodes: Vec<NodeId>,
    pub current_node: Option<NodeId>,
    pub algorithm: Option<Algorithm>,
}

/// Derived render state for the current playback position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualState {
    nodes: BTreeMap<NodeId, NodeStyle>,
    edges: BTreeMap<EdgeId, EdgeStyle>,
    global: GlobalState,
    /// Stored edge directions, used to name edges walked backwards
    #[serde(skip)]
    topology: BTreeSet<EdgeId>,
}

/// Borrowed view of everything a renderer needs.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderState<'a> {
    pub nodes: &'a BTreeMap<NodeId, NodeStyle>,
    pub edges: &'a BTreeMap<EdgeId, EdgeStyle>,
    pub global: &'a GlobalState,
}

impl VisualState {
    /// Empty state that knows the stored direction of each edge in `graph`.
    pub fn for_graph(graph: &Graph) -> Self {
        let mut state = Self::default();
        state.set_graph(graph);
        state
    }

    /// Project one step onto a fresh state.
    pub fn project(step: Option<&Step>, algorithm: Algorithm) -> Self {
        let mut state = Self::default();
        state.update_from_step(step, algorithm);
        state
    }

    /// Replace the known edges and clear all styles.
    pub fn set_graph(&mut self, graph: &Graph) {
        self.topology = graph.edges().iter().map(|e| e.id()).collect();
        self.reset();
    }

    /// Clear every style and the global fields.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.global = GlobalState::default();
    }

    pub fn update_from_step(&mut self, step: Option<&Step>, algorithm: Algorithm) {
        let Some(step) = step else {
            self.reset();
            return;
        };

        self.repaint_neutral();
        self.global.algorithm = Some(algorithm);

        let palette = Palette::for_algorithm(algorithm);

        for &id in &step.visited {
            self.nodes.insert(id, NodeStyle::visited(palette.visited));
        }
        if let Some(current) = step.current {
            self.nodes.insert(current, NodeStyle::emphasized(palette.active));
        }

        match &step.kind {
            StepKind::Update { neighbor, .. } => {
                if let Some(current) = step.current {
                    self.set_edge(current, *neighbor, EdgeStyle::animated(palette.active));
                }
            }
            StepKind::Expand { neighbors } => {
                if let Some(current) = step.current {
                    for &neighbor in neighbors {
                        self.set_edge(current, neighbor, EdgeStyle::animated(palette.active));
                    }
                }
            }
            StepKind::Found { target } => {
                self.nodes.insert(*target, NodeStyle::emphasized(FOUND));
            }
            StepKind::Cycle { node } => {
                self.nodes.insert(*node, NodeStyle::emphasized(CYCLE));
            }
            StepKind::Complete { outcome } => self.paint_outcome(outcome, palette),
            StepKind::Initialize | StepKind::Visit | StepKind::Finish => {}
        }

        self.global.visited_nodes = step.visited.clone();
        self.global.current_node = step.current;
        self.global.highlighted_path = match (algorithm, &step.kind) {
            (Algorithm::Dfs | Algorithm::Bfs, _) => step.path.clone().unwrap_or_default(),
            (_, StepKind::Complete { outcome }) => match outcome {
                Outcome::ShortestPath { path, .. } => path.clone(),
                Outcome::Ordering { order, .. } => order.clone(),
                Outcome::Traversal { path, .. } => path.clone(),
            },
            _ => Vec::new(),
        };
    }

    pub fn current_states(&self) -> RenderState<'_> {
        RenderState {
            nodes: &self.nodes,
            edges: &self.edges,
            global: &self.global,
        }
    }

    /// Style of a node, neutral if never painted.
    pub fn node_style(&self, id: NodeId) -> NodeStyle {
        self.nodes.get(&id).copied().unwrap_or_default()
    }

    /// Style of an edge, neutral if never painted.
    pub fn edge_style(&self, id: EdgeId) -> EdgeStyle {
        self.edges.get(&id).copied().unwrap_or_default()
    }

    pub fn global(&self) -> &GlobalState {
        &self.global
    }

    fn repaint_neutral(&mut self) {
        for style in self.nodes.values_mut() {
            *style = NodeStyle::NEUTRAL;
        }
        for style in self.edges.values_mut() {
            *style = EdgeStyle::NEUTRAL;
        }
    }

    fn paint_outcome(&mut self, outcome: &Outcome, palette: Palette) {
        match outcome {
            Outcome::ShortestPath { path, .. } => {
                for &id in path {
                    self.nodes.insert(id, NodeStyle::emphasized(palette.done));
                }
                for pair in path.windows(2) {
                    self.set_edge(pair[0], pair[1], EdgeStyle::highlighted(palette.done));
                }
            }
            Outcome::Ordering { order, .. } => {
                for &id in order {
                    self.nodes.insert(id, NodeStyle::emphasized(palette.done));
                }
            }
            Outcome::Traversal { found: true, target: Some(target), .. } => {
                self.nodes.insert(*target, NodeStyle::emphasized(palette.done));
            }
            Outcome::Traversal { .. } => {}
        }
    }

    /// Style the edge between `from` and `to` under the id it is stored as.
    fn set_edge(&mut self, from: NodeId, to: NodeId, style: EdgeStyle) {
        let forward = EdgeId::new(from, to);
        let backward = EdgeId::new(to, from);
        let id = if !self.topology.contains(&forward) && self.topology.contains(&backward) {
            backward
        } else {
            forward
        };
        self.edges.insert(id, style);
    }
}
