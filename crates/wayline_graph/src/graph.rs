//! Waypoint graph with closed-loop maintenance
//!
//! Nodes are kept in insertion order and that order defines a patrol circuit.
//! Adding or removing a node rewires the loop edges so that with three or more
//! nodes the edges form one directed cycle `n0 -> n1 -> ... -> nk -> n0`. With
//! one or two nodes only the open chain is kept.
//!
//! Explicit edges added through [`WaypointGraph::add_edge`] are not part of the
//! loop bookkeeping. They survive node edits unless they touch the removed node
//! or are the outgoing edge detached from the previous last node on append.

use crate::color::Color;
use crate::edge::{Edge, EdgeId};
use crate::node::{Node, NodeId};
use crate::snap;
use glam::Vec3;
use std::collections::BTreeMap;

/// Directed positional graph of waypoints
#[derive(Clone, Debug)]
pub struct WaypointGraph {
    /// Nodes in insertion order
    nodes: Vec<Node>,
    /// All edges, keyed by creation order
    edges: BTreeMap<EdgeId, Edge>,
    /// Next node ID
    next_node_id: u64,
    /// Next edge ID
    next_edge_id: u64,
}

impl Default for WaypointGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: BTreeMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    /// Build a graph by appending each position in order
    pub fn from_positions<I>(positions: I, color: Color) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut graph = Self::new();
        for position in positions {
            graph.add_node(position, color);
        }
        graph
    }

    // ==================== Nodes ====================

    /// Append a node and rewire the loop around it
    pub fn add_node(&mut self, position: Vec3, color: Color) -> NodeId {
        let count = self.nodes.len();
        let first = self.nodes.first().map(Node::id);
        let last = self.nodes.last().map(|n| (n.id(), n.color));

        if let (Some(first), Some((last, _))) = (first, last) {
            self.detach_outgoing(last, first);
        }

        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(Node::new(id, position, color, count));

        if let Some((last, last_color)) = last {
            self.insert_edge(last, id, last_color);
        }
        if count + 1 > 2 {
            if let Some(first) = first {
                self.insert_edge(id, first, color);
            }
        }

        log::trace!("Added waypoint {:?} at {} ({} nodes)", id, position, count + 1);
        id
    }

    /// Append a white node halfway between the first and last nodes
    pub fn add_default_node(&mut self) -> NodeId {
        let position = match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => first.value.lerp(last.value, 0.5),
            _ => Vec3::ZERO,
        };
        self.add_node(position, Color::WHITE)
    }

    /// Remove a node together with every edge touching it.
    ///
    /// Unknown ids are ignored.
    pub fn remove_node(&mut self, id: NodeId) {
        let Some(pos) = self.position_of(id) else {
            log::debug!("Ignoring removal of unknown waypoint {:?}", id);
            return;
        };

        let prev = pos.checked_sub(1).map(|i| self.nodes[i].id());
        let next = self.nodes.get(pos + 1).map(Node::id);

        self.nodes.remove(pos);
        self.edges.retain(|_, edge| !edge.touches(id));
        self.reindex();

        if let (Some(prev), Some(next)) = (prev, next) {
            if self.find_edge(prev, next).is_none() {
                let color = self.node(prev).map(|n| n.color).unwrap_or_default();
                self.insert_edge(prev, next, color);
            }
        }
        self.close_loop();

        log::trace!("Removed waypoint {:?} ({} nodes left)", id, self.nodes.len());
    }

    /// Remove the most recently appended node, if any
    pub fn remove_last_node(&mut self) {
        if let Some(last) = self.nodes.last().map(Node::id) {
            self.remove_node(last);
        }
    }

    /// Remove all nodes, and with them all edges
    pub fn clear_nodes(&mut self) {
        self.nodes.clear();
        self.clear_edges();
    }

    /// Move a node
    pub fn set_node_position(&mut self, id: NodeId, position: Vec3) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.value = position;
                true
            }
            None => false,
        }
    }

    /// Recolor a node and the edges leaving it
    pub fn set_node_color(&mut self, id: NodeId, color: Color) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.color = color;
        for edge in self.edges.values_mut().filter(|e| e.from == id) {
            edge.color = color;
        }
        true
    }

    /// Give every edge the color of its source node
    pub fn sync_edge_colors(&mut self) {
        for edge in self.edges.values_mut() {
            if let Some(node) = self.nodes.iter().find(|n| n.id() == edge.from) {
                edge.color = node.color;
            }
        }
    }

    /// Round every node position to a grid of `size`
    pub fn snap_nodes(&mut self, size: f32) {
        for node in &mut self.nodes {
            node.value = snap::snap_to_grid(node.value, size);
        }
    }

    // ==================== Edges ====================

    /// Add an explicit edge. Returns `None` if either endpoint is missing.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        let color = self.node(from)?.color;
        if !self.contains_node(to) {
            log::debug!("Refusing edge {:?} -> {:?}: target missing", from, to);
            return None;
        }
        Some(self.insert_edge(from, to, color))
    }

    /// Add an explicit edge with a weight
    pub fn add_weighted_edge(&mut self, from: NodeId, to: NodeId, weight: f32) -> Option<EdgeId> {
        let id = self.add_edge(from, to)?;
        if let Some(edge) = self.edges.get_mut(&id) {
            edge.weight = weight;
        }
        Some(id)
    }

    /// Remove one edge. Unknown ids are ignored.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        self.edges.remove(&id)
    }

    /// Remove all edges
    pub fn clear_edges(&mut self) {
        self.edges.clear();
    }

    // ==================== Queries ====================

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    /// Node at an insertion-order position
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn first(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Edges leaving a node
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(move |e| e.from == id)
    }

    /// Edges entering a node
    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(move |e| e.to == id)
    }

    /// First edge going from `from` to `to`
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.edges.values().find(|e| e.connects(from, to))
    }

    /// Node positions in insertion order
    pub fn positions(&self) -> Vec<Vec3> {
        self.nodes.iter().map(|n| n.value).collect()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.position_of(id).is_some()
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

    /// Check that the edges are exactly the insertion-order cycle
    pub fn is_closed_loop(&self) -> bool {
        let n = self.nodes.len();
        if n < 3 || self.edges.len() != n {
            return false;
        }
        (0..n).all(|i| {
            let from = self.nodes[i].id();
            let to = self.nodes[(i + 1) % n].id();
            self.find_edge(from, to).is_some()
        })
    }

    /// Summed length of all edges
    pub fn total_length(&self) -> f32 {
        self.edges
            .values()
            .filter_map(|e| Some(self.node(e.from)?.value.distance(self.node(e.to)?.value)))
            .sum()
    }

    // ==================== Internals ====================

    fn position_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    fn reindex(&mut self) {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.set_index(index);
        }
    }

    fn insert_edge(&mut self, from: NodeId, to: NodeId, color: Color) -> EdgeId {
        let id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.insert(id, Edge::new(id, from, to, color));
        id
    }

    /// Drop the single outgoing edge of `node`, preferring the one to `preferred`
    fn detach_outgoing(&mut self, node: NodeId, preferred: NodeId) {
        let target = self
            .edges
            .values()
            .find(|e| e.connects(node, preferred))
            .or_else(|| self.edges.values().find(|e| e.from == node))
            .map(Edge::id);

        if let Some(id) = target {
            self.edges.remove(&id);
        }
    }

    /// Restore the closing edge for three or more nodes, drop it for two
    fn close_loop(&mut self) {
        let (Some(first), Some(last)) = (self.nodes.first(), self.nodes.last()) else {
            return;
        };
        let (first, last, last_color) = (first.id(), last.id(), last.color);

        match self.nodes.len() {
            1 => {}
            2 => self.edges.retain(|_, e| !e.connects(last, first)),
            _ => {
                if self.find_edge(last, first).is_none() {
                    self.insert_edge(last, first, last_color);
                }
            }
        }
    }
}
