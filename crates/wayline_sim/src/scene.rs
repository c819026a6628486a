//! Scene Loader - Parses declarative patrol scene files
//!
//! A scene names a set of waypoint graphs and the agents that patrol them.
//! Graphs are rebuilt node by node so their loop edges come from the graph
//! itself and are never written in the file.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use wayline_graph::{Color, PersistError, WaypointGraph};
use wayline_patrol::{AgentId, PatrolConfig, PatrolError, PatrolWorld, WorldConfig};

// ============================================================================
// Scene Definition Structures
// ============================================================================

/// Root scene definition loaded from a scene file
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SceneDefinition {
    /// Fixed-step settings
    #[serde(default)]
    pub world: WorldConfig,

    /// Waypoint graphs
    #[serde(default)]
    pub graph: Vec<GraphDef>,

    /// Patrolling agents
    #[serde(default)]
    pub patroller: Vec<PatrollerDef>,
}

/// A named waypoint graph
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphDef {
    pub name: String,

    /// Nodes in insertion order
    #[serde(default)]
    pub nodes: Vec<NodeDef>,

    /// Grid size the nodes are snapped to after loading
    #[serde(default)]
    pub snap: Option<f32>,
}

/// A single waypoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeDef {
    pub position: [f32; 3],

    /// RGBA, white when absent
    #[serde(default)]
    pub color: Option<[f32; 4]>,
}

/// An agent patrolling one of the scene's graphs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatrollerDef {
    /// Name of the graph to patrol
    pub graph: String,

    /// Spawn position, the graph's first node when absent
    #[serde(default)]
    pub start: Option<[f32; 3]>,

    #[serde(flatten)]
    pub config: PatrolConfig,
}

// ============================================================================
// Errors
// ============================================================================

/// Error type for scene loading
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate graph name: {0}")]
    DuplicateGraph(String),

    #[error("Patroller references unknown graph: {0}")]
    UnknownGraph(String),

    #[error(transparent)]
    Patrol(#[from] PatrolError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Load a scene definition from a file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<SceneDefinition, SceneError> {
    let content = std::fs::read_to_string(path)?;
    load_scene_from_str(&content)
}

/// Load a scene definition from a TOML string
pub fn load_scene_from_str(content: &str) -> Result<SceneDefinition, SceneError> {
    let scene: SceneDefinition = toml::from_str(content)?;
    Ok(scene)
}

// ============================================================================
// Building
// ============================================================================

impl GraphDef {
    /// Build the graph by appending every node in order
    pub fn build(&self) -> WaypointGraph {
        let mut graph = WaypointGraph::new();
        for node in &self.nodes {
            let color = node.color.map(Color::from_array).unwrap_or_default();
            graph.add_node(Vec3::from_array(node.position), color);
        }
        if let Some(size) = self.snap {
            graph.snap_nodes(size);
        }
        graph
    }
}

impl SceneDefinition {
    /// Build every graph, keyed by name
    pub fn build_graphs(&self) -> Result<BTreeMap<String, WaypointGraph>, SceneError> {
        let mut graphs = BTreeMap::new();
        for def in &self.graph {
            if graphs.insert(def.name.clone(), def.build()).is_some() {
                return Err(SceneError::DuplicateGraph(def.name.clone()));
            }
            log::debug!("Built graph '{}' with {} nodes", def.name, def.nodes.len());
        }
        Ok(graphs)
    }

    /// Create a world and spawn every patroller on its graph.
    ///
    /// Returns the world together with the graph name each agent patrols.
    pub fn build_world(
        &self,
        graphs: &BTreeMap<String, WaypointGraph>,
    ) -> Result<(PatrolWorld, BTreeMap<AgentId, String>), SceneError> {
        let mut world = PatrolWorld::new(self.world.clone())?;
        let mut assignments = BTreeMap::new();

        for def in &self.patroller {
            let graph = graphs
                .get(&def.graph)
                .ok_or_else(|| SceneError::UnknownGraph(def.graph.clone()))?;
            let start = def
                .start
                .map(Vec3::from_array)
                .or_else(|| graph.first().map(|node| node.value))
                .unwrap_or(Vec3::ZERO);

            let id = world.spawn_on_graph(start, def.config.clone(), graph)?;
            assignments.insert(id, def.graph.clone());
        }

        Ok((world, assignments))
    }
}
