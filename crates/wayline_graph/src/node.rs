//! Waypoint nodes
//!
//! A node is a positioned, colored point. Its id is stable for the lifetime of
//! the graph that created it; its index follows insertion order and shifts
//! when earlier nodes are removed.

use crate::color::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A waypoint in the graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identity
    id: NodeId,
    /// World position
    pub value: Vec3,
    /// Display color
    pub color: Color,
    /// Position in insertion order
    index: usize,
}

impl Node {
    pub(crate) fn new(id: NodeId, value: Vec3, color: Color, index: usize) -> Self {
        Self {
            id,
            value,
            color,
            index,
        }
    }

    /// Node id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Position in insertion order
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
