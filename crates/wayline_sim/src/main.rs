//! Wayline Simulator
//!
//! Loads a patrol scene, runs every agent at a fixed rate for a while and
//! logs what they do.
//!
//! Run with: cargo run -p wayline_sim -- crates/wayline_sim/scenes/square.toml --seconds 10

mod scene;

use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use wayline_graph::{GraphSnapshot, SnapshotFormat, WaypointGraph};
use wayline_patrol::{AgentId, PatrolEvent, PatrolWorld};

use crate::scene::SceneError;

/// Frame delta fed to the world, independent of its fixed timestep
const FRAME_DELTA: f32 = 1.0 / 60.0;

#[derive(Debug, Parser)]
#[command(name = "wayline_sim", about = "Run waypoint patrol scenes headless")]
struct Args {
    /// Scene file (TOML)
    scene: PathBuf,

    /// Simulated time in seconds
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Directory to write a snapshot of every graph to
    #[arg(long)]
    save_graphs: Option<PathBuf>,

    /// Snapshot encoding
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Binary,
}

impl From<Format> for SnapshotFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => SnapshotFormat::Json,
            Format::Binary => SnapshotFormat::Binary,
        }
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SceneError> {
    let definition = scene::load_scene(&args.scene)?;
    log::info!(
        "Loaded scene {} ({} graphs, {} patrollers)",
        args.scene.display(),
        definition.graph.len(),
        definition.patroller.len()
    );

    let graphs = definition.build_graphs()?;
    for (name, graph) in &graphs {
        log::info!(
            "Graph '{}': {} nodes, {} edges, length {:.2}",
            name,
            graph.node_count(),
            graph.edge_count(),
            graph.total_length()
        );
    }

    let (mut world, assignments) = definition.build_world(&graphs)?;
    let ticks = simulate(&mut world, &assignments, args.seconds);
    log::info!("Ran {} ticks over {:.2}s", ticks, args.seconds);

    for (id, agent) in world.agents() {
        log::info!(
            "Agent {} at {} ({:?})",
            id.raw(),
            agent.body.position,
            agent.controller.phase()
        );
    }

    if let Some(dir) = &args.save_graphs {
        save_graphs(&graphs, dir, args.format.into())?;
    }

    Ok(())
}

/// Feed fixed frames to the world and log its events. Returns the ticks run.
fn simulate(world: &mut PatrolWorld, assignments: &BTreeMap<AgentId, String>, seconds: f32) -> u64 {
    let frames = (seconds.max(0.0) / FRAME_DELTA).round() as u64;
    let mut ticks = 0u64;
    let mut laps: BTreeMap<_, u32> = BTreeMap::new();

    for _ in 0..frames {
        ticks += u64::from(world.update(FRAME_DELTA));

        for (id, event) in world.drain_events() {
            let graph = assignments.get(&id).map(String::as_str).unwrap_or("?");
            match event {
                PatrolEvent::Arrived { waypoint } => {
                    log::debug!("Agent {} on '{}' reached {}", id.raw(), graph, waypoint);
                }
                PatrolEvent::Departed { target } => {
                    log::trace!("Agent {} on '{}' heading to {}", id.raw(), graph, target);
                }
                PatrolEvent::LoopRestarted => {
                    let count = laps.entry(id).or_default();
                    *count += 1;
                    log::info!("Agent {} finished lap {} of '{}'", id.raw(), count, graph);
                }
            }
        }
    }

    ticks
}

fn save_graphs(graphs: &BTreeMap<String, WaypointGraph>, dir: &Path, format: SnapshotFormat) -> Result<(), SceneError> {
    std::fs::create_dir_all(dir)?;
    for (name, graph) in graphs {
        let path = dir.join(format!("{}.{}", name, format.extension()));
        GraphSnapshot::capture(graph).save(&path, format)?;
        log::info!("Saved graph '{}' to {}", name, path.display());
    }
    Ok(())
}
