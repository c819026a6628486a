//! Wayline Graph - Closed-loop waypoint graphs
//!
//! A small directed graph of positioned, colored waypoints. Nodes keep their
//! insertion order and the graph rewires its edges on every append or removal
//! so that the nodes always form a walkable circuit.
//!
//! # Features
//!
//! - Stable node and edge ids (edges refer to nodes weakly)
//! - Automatic loop closing for three or more nodes
//! - Explicit edges with optional weights for custom topologies
//! - Grid snapping
//! - JSON / binary snapshots and a flat key-store compatibility layer
//!
//! # Example
//!
//! ```
//! use wayline_graph::prelude::*;
//! use glam::Vec3;
//!
//! let mut graph = WaypointGraph::new();
//! let a = graph.add_node(Vec3::new(0.0, 0.0, 0.0), Color::RED);
//! let b = graph.add_node(Vec3::new(5.0, 0.0, 0.0), Color::GREEN);
//! let c = graph.add_node(Vec3::new(5.0, 0.0, 5.0), Color::BLUE);
//!
//! assert!(graph.is_closed_loop());
//! assert!(graph.find_edge(c, a).is_some());
//!
//! graph.remove_node(b);
//! assert_eq!(graph.edge_count(), 1);
//! ```

pub mod color;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
pub mod persist;
pub mod snap;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::edge::{Edge, EdgeId, DEFAULT_WEIGHT};
    pub use crate::error::{PersistError, Result};
    pub use crate::graph::WaypointGraph;
    pub use crate::node::{Node, NodeId};
    pub use crate::persist::{
        load_keyed, save_keyed, GraphSnapshot, KeyValueStore, MemoryStore, SnapshotFormat,
        WaypointRecord,
    };
}

pub use prelude::*;
