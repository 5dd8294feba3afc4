//! The graph snapshot an algorithm run reads from.

use std::collections::HashMap;

use crate::{Edge, Error, Node, NodeId, Result};

/// How a run interprets stored edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    /// Edges are followed from `source` to `target` only.
    Directed,
    /// Every edge is followed both ways.
    Undirected,
}

impl Orientation {
    /// Map the usual "is directed" toggle onto an orientation.
    pub const fn from_directed(directed: bool) -> Self {
        if directed {
            Orientation::Directed
        } else {
            Orientation::Undirected
        }
    }

    pub const fn is_directed(&self) -> bool {
        matches!(self, Orientation::Directed)
    }
}

/// Ordered nodes and edges, unique by node id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<NodeId, usize>,
}

impl Graph {
    /// Build a graph, rejecting duplicate ids and dangling edges.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id, position).is_some() {
                return Err(Error::DuplicateNode(node.id));
            }
        }

        for edge in &edges {
            for endpoint in [edge.source, edge.target] {
                if !index.contains_key(&endpoint) {
                    return Err(Error::UnknownEndpoint {
                        from: edge.source,
                        to: edge.target,
                        missing: endpoint,
                    });
                }
            }
        }

        Ok(Self { nodes, edges, index })
    }

    /// Build a graph whose nodes are the edge endpoints in first-appearance order.
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        let mut graph = Self::default();
        for edge in &edges {
            graph.declare(edge.source);
            graph.declare(edge.target);
        }
        graph.edges = edges;
        graph
    }

    /// Add a node at the origin unless it already exists.
    pub(crate) fn declare(&mut self, id: NodeId) {
        if !self.index.contains_key(&id) {
            self.index.insert(id, self.nodes.len());
            self.nodes.push(Node::new(id));
        }
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.declare(edge.source);
        self.declare(edge.target);
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node ids in graph order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Position of a node in graph order.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Build the neighbor lists for one run.
    pub fn adjacency(&self, orientation: Orientation) -> Adjacency {
        Adjacency::build(self, orientation)
    }
}

/// A reachable neighbor and the cost of the edge leading to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: NodeId,
    pub cost: f64,
}

/// Per-node neighbor lists in edge-list order.
///
/// Under [`Orientation::Undirected`] an edge appears in the lists of both
/// endpoints at its own list position. Self-loops appear once.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    lists: HashMap<NodeId, Vec<Neighbor>>,
}

impl Adjacency {
    fn build(graph: &Graph, orientation: Orientation) -> Self {
        let mut lists: HashMap<NodeId, Vec<Neighbor>> = HashMap::new();
        for edge in graph.edges() {
            let cost = edge.cost();
            lists
                .entry(edge.source)
                .or_default()
                .push(Neighbor { id: edge.target, cost });
            if !orientation.is_directed() && !edge.is_self_loop() {
                lists
                    .entry(edge.target)
                    .or_default()
                    .push(Neighbor { id: edge.source, cost });
            }
        }
        Self { lists }
    }

    /// Neighbors of `id` with edge costs, in edge-list order.
    pub fn neighbors(&self, id: NodeId) -> &[Neighbor] {
        self.lists.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neighbor ids of `id`, in edge-list order.
    pub fn neighbor_ids(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.neighbors(id).iter().map(|n| n.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn rejects_duplicate_nodes() {
        let nodes = vec![Node::new(NodeId(1)), Node::new(NodeId(1))];
        assert_eq!(Graph::new(nodes, vec![]), Err(Error::DuplicateNode(NodeId(1))));
    }

    #[test]
    fn rejects_dangling_edges() {
        let nodes = vec![Node::new(NodeId(1))];
        let edges = vec![Edge::new(NodeId(1), NodeId(2))];
        assert_eq!(
            Graph::new(nodes, edges),
            Err(Error::UnknownEndpoint {
                from: NodeId(1),
                to: NodeId(2),
                missing: NodeId(2),
            })
        );
    }

    #[test]
    fn from_edges_keeps_first_appearance_order() {
        let graph = Graph::from_edges(vec![
            Edge::new(NodeId(4), NodeId(2)),
            Edge::new(NodeId(2), NodeId(9)),
            Edge::new(NodeId(9), NodeId(4)),
        ]);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), ids(&[4, 2, 9]));
        assert_eq!(graph.position(NodeId(9)), Some(2));
    }

    #[test]
    fn directed_adjacency_follows_edge_order() {
        let graph = Graph::from_edges(vec![
            Edge::new(NodeId(1), NodeId(3)),
            Edge::new(NodeId(2), NodeId(1)),
            Edge::new(NodeId(1), NodeId(2)),
        ]);
        let adj = graph.adjacency(Orientation::Directed);
        assert_eq!(adj.neighbor_ids(NodeId(1)).collect::<Vec<_>>(), ids(&[3, 2]));
        assert_eq!(adj.neighbor_ids(NodeId(3)).count(), 0);
    }

    #[test]
    fn undirected_adjacency_mirrors_edges() {
        let graph = Graph::from_edges(vec![
            Edge::new(NodeId(1), NodeId(3)),
            Edge::new(NodeId(2), NodeId(1)),
            Edge::new(NodeId(5), NodeId(5)),
        ]);
        let adj = graph.adjacency(Orientation::Undirected);
        assert_eq!(adj.neighbor_ids(NodeId(1)).collect::<Vec<_>>(), ids(&[3, 2]));
        assert_eq!(adj.neighbor_ids(NodeId(3)).collect::<Vec<_>>(), ids(&[1]));
        assert_eq!(adj.neighbor_ids(NodeId(5)).collect::<Vec<_>>(), ids(&[5]));
    }
}
