//! Plain-text edge lists.
//!
//! One entry per line, tokens separated by whitespace:
//!
//! - `a` declares an isolated node
//! - `a b` declares an unweighted edge `a -> b`
//! - `a b w` declares an edge with weight `w`
//!
//! Anything after `#` is a comment. Lines whose node tokens are not
//! integers are dropped; a weight that is not a finite number is treated as
//! absent. Parsing never fails.

use std::fmt::Write as _;

use crate::{Edge, Graph, NodeId};

/// Parse an edge list into a graph. Nodes are ordered by first appearance.
pub fn parse_edge_list(text: &str) -> Graph {
    let mut graph = Graph::default();

    for line in text.lines() {
        let content = line.split('#').next().unwrap_or_default();
        let tokens: Vec<&str> = content.split_whitespace().collect();

        match tokens.as_slice() {
            [] => {}
            [single] => {
                if let Some(id) = parse_node(single) {
                    graph.declare(id);
                }
            }
            [source, target, rest @ ..] => {
                let (Some(source), Some(target)) = (parse_node(source), parse_node(target)) else {
                    continue;
                };
                let weight = rest.first().and_then(|w| parse_weight(w));
                graph.push_edge(Edge { source, target, weight });
            }
        }
    }

    graph
}

fn parse_node(token: &str) -> Option<NodeId> {
    token.parse::<i64>().ok().map(NodeId)
}

fn parse_weight(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|w| w.is_finite())
}

/// Render a graph back to an edge list.
///
/// Edges come first in graph order, followed by one line per node that has
/// no incident edge.
pub fn to_edge_list(graph: &Graph) -> String {
    let mut out = String::new();

    for edge in graph.edges() {
        match edge.weight {
            Some(weight) => {
                let _ = writeln!(out, "{} {} {}", edge.source, edge.target, weight);
            }
            None => {
                let _ = writeln!(out, "{} {}", edge.source, edge.target);
            }
        }
    }

    for id in graph.node_ids() {
        let isolated = !graph
            .edges()
            .iter()
            .any(|e| e.source == id || e.target == id);
        if isolated {
            let _ = writeln!(out, "{}", id);
        }
    }

    out
}
