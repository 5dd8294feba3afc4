//! Nodes, edges and their identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::DEFAULT_WEIGHT;

/// Identity of a node. Positions never participate in identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A node with a canvas position.
///
/// The position belongs to the layout layer; algorithms only read `id`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub x: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub y: f64,
}

impl Node {
    /// Create a node at the canvas origin.
    pub const fn new(id: NodeId) -> Self {
        Self { id, x: 0.0, y: 0.0 }
    }

    /// Create a node at a given position.
    pub const fn at(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

/// A stored edge. Always directed in storage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: Option<f64>,
}

impl Edge {
    /// Create an unweighted edge.
    pub const fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target, weight: None }
    }

    /// Create a weighted edge.
    pub const fn weighted(source: NodeId, target: NodeId, weight: f64) -> Self {
        Self { source, target, weight: Some(weight) }
    }

    /// Cost used by shortest-path relaxation.
    pub fn cost(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Identifier of this edge as seen by the renderer.
    pub fn id(&self) -> EdgeId {
        EdgeId::new(self.source, self.target)
    }

    /// True when the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A `source-target` pair naming an edge for styling purposes.
///
/// Parallel edges share an id; they are drawn and styled together. A minus
/// sign can only lead an integer, so the separator is always the first `-`
/// after the first character: `3--4` is `3` to `-4`, `-3-4` is `-3` to `4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeId {
    pub const fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

impl FromStr for EdgeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidEdgeId(s.to_string());
        let split = s
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i)
            .ok_or_else(invalid)?;
        let source = s[..split].parse().map_err(|_| invalid())?;
        let target = s[split + 1..].parse().map_err(|_| invalid())?;
        Ok(Self::new(NodeId(source), NodeId(target)))
    }
}

// Serialized as the "source-target" string so it can key a JSON object.
#[cfg(feature = "serde")]
impl serde::Serialize for EdgeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EdgeId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
