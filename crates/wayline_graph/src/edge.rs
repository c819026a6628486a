//! Directed edges between waypoints

use crate::color::Color;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Weight given to edges that were created without one
pub const DEFAULT_WEIGHT: f32 = 1.0;

/// Unique identifier for an edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A directed connection between two nodes.
///
/// Endpoints are ids, not owned nodes. An edge whose endpoint is gone is
/// invalid; the graph prunes those when a node is removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Edge id
    id: EdgeId,
    /// Source node
    pub from: NodeId,
    /// Target node
    pub to: NodeId,
    /// Display color, usually the source node's color
    pub color: Color,
    /// Traversal weight
    pub weight: f32,
}

impl Edge {
    pub(crate) fn new(id: EdgeId, from: NodeId, to: NodeId, color: Color) -> Self {
        Self {
            id,
            from,
            to,
            color,
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Set a weight
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Edge id
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Check if the edge touches a node on either end
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    /// Check if this edge goes from `from` to `to`
    pub fn connects(&self, from: NodeId, to: NodeId) -> bool {
        self.from == from && self.to == to
    }
}
