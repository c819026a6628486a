//! Graph persistence
//!
//! Only the ordered node records are stored. Loop edges are rebuilt by
//! replaying the records through [`WaypointGraph::add_node`], so a restored
//! graph always satisfies the loop invariant.
//!
//! Two storage shapes are supported:
//!
//! - [`GraphSnapshot`]: versioned JSON or binary document
//! - [`KeyValueStore`]: the flat per-index key scheme of earlier authoring
//!   sessions (`Length`, `{i}x`, `{i}y`, `{i}z`, `{i}r`, `{i}g`, `{i}b`, `{i}a`)

use crate::color::Color;
use crate::error::{PersistError, Result};
use crate::graph::WaypointGraph;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Key holding the node count in a flat store
pub const LENGTH_KEY: &str = "Length";

/// One stored waypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaypointRecord {
    pub position: [f32; 3],
    #[serde(default)]
    pub color: Color,
}

impl WaypointRecord {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

impl WaypointGraph {
    /// Ordered records for every node
    pub fn records(&self) -> Vec<WaypointRecord> {
        self.nodes()
            .iter()
            .map(|n| WaypointRecord::new(n.value, n.color))
            .collect()
    }

    /// Rebuild a graph by appending each record in order
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = WaypointRecord>,
    {
        let mut graph = Self::new();
        for record in records {
            graph.add_node(record.position(), record.color);
        }
        graph
    }
}

/// Snapshot encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// JSON (human readable)
    #[default]
    Json,
    /// Binary (compact)
    Binary,
}

impl SnapshotFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Binary => "wpt",
        }
    }
}

/// Versioned document holding a graph's node records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub version: u32,
    pub nodes: Vec<WaypointRecord>,
}

impl GraphSnapshot {
    /// Capture a graph
    pub fn capture(graph: &WaypointGraph) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            nodes: graph.records(),
        }
    }

    /// Rebuild the graph
    pub fn restore(&self) -> WaypointGraph {
        WaypointGraph::from_records(self.nodes.iter().copied())
    }

    /// Encode to bytes
    pub fn encode(&self, format: SnapshotFormat) -> Result<Vec<u8>> {
        match format {
            SnapshotFormat::Json => serde_json::to_vec_pretty(self)
                .map_err(|e| PersistError::Serialization(e.to_string())),
            SnapshotFormat::Binary => {
                bincode::serialize(self).map_err(|e| PersistError::Serialization(e.to_string()))
            }
        }
    }

    /// Decode from bytes, rejecting snapshots from a newer format
    pub fn decode(bytes: &[u8], format: SnapshotFormat) -> Result<Self> {
        let snapshot: Self = match format {
            SnapshotFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| PersistError::Deserialization(e.to_string()))?,
            SnapshotFormat::Binary => bincode::deserialize(bytes)
                .map_err(|e| PersistError::Deserialization(e.to_string()))?,
        };

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(PersistError::VersionMismatch(snapshot.version, SNAPSHOT_VERSION));
        }
        Ok(snapshot)
    }

    /// Write to a file
    pub fn save(&self, path: impl AsRef<Path>, format: SnapshotFormat) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.encode(format)?)?;
        log::debug!("Saved {} waypoints to {}", self.nodes.len(), path.display());
        Ok(())
    }

    /// Read from a file
    pub fn load(path: impl AsRef<Path>, format: SnapshotFormat) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = Self::decode(&fs::read(path)?, format)?;
        log::debug!("Loaded {} waypoints from {}", snapshot.nodes.len(), path.display());
        Ok(snapshot)
    }
}

// ==================== Flat key store ====================

/// Flat key-value storage such as an engine preference store
pub trait KeyValueStore {
    fn get_int(&self, key: &str) -> Option<i32>;
    fn set_int(&mut self, key: &str, value: i32);
    fn get_float(&self, key: &str) -> Option<f32>;
    fn set_float(&mut self, key: &str, value: f32);
}

/// In-memory [`KeyValueStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    ints: HashMap<String, i32>,
    floats: HashMap<String, f32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ints.len() + self.floats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ints.is_empty() && self.floats.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i32> {
        self.ints.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.ints.insert(key.to_string(), value);
    }

    fn get_float(&self, key: &str) -> Option<f32> {
        self.floats.get(key).copied()
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.floats.insert(key.to_string(), value);
    }
}

/// Write every node under its index keys plus the count
pub fn save_keyed<S: KeyValueStore + ?Sized>(graph: &WaypointGraph, store: &mut S) {
    let count = i32::try_from(graph.node_count()).unwrap_or(i32::MAX);
    store.set_int(LENGTH_KEY, count);

    for node in graph.nodes() {
        let i = node.index();
        store.set_float(&format!("{i}x"), node.value.x);
        store.set_float(&format!("{i}y"), node.value.y);
        store.set_float(&format!("{i}z"), node.value.z);
        store.set_float(&format!("{i}r"), node.color.r);
        store.set_float(&format!("{i}g"), node.color.g);
        store.set_float(&format!("{i}b"), node.color.b);
        store.set_float(&format!("{i}a"), node.color.a);
    }
}

/// Rebuild a graph from index keys.
///
/// Missing positions read as `0.0` and missing color components as `1.0`.
pub fn load_keyed<S: KeyValueStore + ?Sized>(store: &S) -> WaypointGraph {
    let count = store.get_int(LENGTH_KEY).unwrap_or(0).max(0);
    let float = |key: String, default: f32| store.get_float(&key).unwrap_or(default);

    let records = (0..count).map(|i| WaypointRecord {
        position: [
            float(format!("{i}x"), 0.0),
            float(format!("{i}y"), 0.0),
            float(format!("{i}z"), 0.0),
        ],
        color: Color::rgba(
            float(format!("{i}r"), 1.0),
            float(format!("{i}g"), 1.0),
            float(format!("{i}b"), 1.0),
            float(format!("{i}a"), 1.0),
        ),
    });

    let graph = WaypointGraph::from_records(records);
    log::debug!("Restored {} waypoints from key store", graph.node_count());
    graph
}
