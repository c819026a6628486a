//! Wayline Patrol - Waypoint patrolling agents
//!
//! Drives bodies around a cyclic list of waypoints, one fixed tick at a time.
//!
//! # Features
//!
//! - Phase state machine (move, arrive, turn, advance)
//! - Arrival with overshoot detection and snapping
//! - Optional smooth turning toward the next waypoint
//! - Live speed changes
//! - Fixed-timestep world for many agents
//!
//! # Example
//!
//! ```
//! use wayline_patrol::prelude::*;
//! use glam::Vec3;
//!
//! let mut world = PatrolWorld::new(WorldConfig::default()).unwrap();
//! let path = PatrolPath::new([Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]);
//! let agent = world.spawn(Vec3::ZERO, PatrolConfig::without_rotation(), path).unwrap();
//!
//! world.update(1.0);
//! assert!(world.agent(agent).unwrap().controller.is_patrolling());
//! ```

pub mod body;
pub mod config;
pub mod controller;
pub mod error;
pub mod path;
pub mod world;

pub mod prelude {
    pub use crate::body::{look_rotation, KinematicBody, MotionBody};
    pub use crate::config::{PatrolConfig, WorldConfig};
    pub use crate::controller::{PatrolController, PatrolEvent, PatrolPhase};
    pub use crate::error::{PatrolError, Result};
    pub use crate::path::PatrolPath;
    pub use crate::world::{AgentId, PatrolAgent, PatrolWorld};
}

pub use prelude::*;
