//! Patrol state machine
//!
//! One [`PatrolController::tick`] per fixed simulation step. The phases run in
//! a fixed order inside a tick, so a phase that finishes hands over to the next
//! one immediately:
//!
//! ```text
//! Moving ──arrive──▶ Arrived ──aim──▶ Rotating ──facing──▶ Advancing ──▶ Moving
//!    ▲                                                                    │
//!    └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Idle` is entered only for an empty path or after [`PatrolController::stop`].

use crate::body::{look_rotation, MotionBody};
use crate::config::{validate_speed, PatrolConfig};
use crate::error::Result;
use crate::path::PatrolPath;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Current phase of the patrol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatrolPhase {
    /// Nothing to do
    Idle,
    /// Travelling toward the current target
    Moving,
    /// Standing on a waypoint, about to aim at the next one
    Arrived,
    /// Turning toward the next target
    Rotating,
    /// Picking the next target
    Advancing,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PatrolEvent {
    /// The body was snapped onto a waypoint
    Arrived { waypoint: Vec3 },
    /// The body set off toward a new target
    Departed { target: Vec3 },
    /// The path ran out and a new lap was started
    LoopRestarted,
}

/// Drives a [`MotionBody`] around a [`PatrolPath`]
#[derive(Debug, Clone)]
pub struct PatrolController {
    config: PatrolConfig,
    path: PatrolPath,
    phase: PatrolPhase,
    /// Waypoint being travelled to
    target: Vec3,
    /// Offset from the body to the target when last aimed
    direction: Vec3,
    /// Orientation to reach while rotating
    heading: Quat,
    /// Squared distance seen on the previous moving tick
    last_distance_squared: f32,
    /// Rotation blend factor
    blend: f32,
    /// Speed the current velocity was computed with
    applied_speed: f32,
    events: Vec<PatrolEvent>,
}

impl PatrolController {
    /// Create an idle controller
    pub fn new(config: PatrolConfig) -> Result<Self> {
        config.validate()?;
        let applied_speed = config.speed;
        Ok(Self {
            config,
            path: PatrolPath::default(),
            phase: PatrolPhase::Idle,
            target: Vec3::ZERO,
            direction: Vec3::ZERO,
            heading: Quat::IDENTITY,
            last_distance_squared: f32::MAX,
            blend: 0.0,
            applied_speed,
            events: Vec::new(),
        })
    }

    /// (Re)start patrolling `path` from its first waypoint.
    ///
    /// The body first turns toward the first waypoint, then walks the path.
    /// An empty path leaves the controller idle.
    pub fn start(&mut self, path: PatrolPath) {
        self.path = path;
        self.path.restart();
        self.last_distance_squared = f32::MAX;
        self.blend = 0.0;
        self.phase = if self.path.is_empty() {
            PatrolPhase::Idle
        } else {
            PatrolPhase::Arrived
        };
        log::debug!("Patrol started over {} waypoints", self.path.len());
    }

    /// Go idle. The body's velocity is left as is.
    pub fn stop(&mut self) {
        self.phase = PatrolPhase::Idle;
    }

    /// Change speed; a body in flight is rescaled on the next tick
    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        validate_speed(speed)?;
        self.config.speed = speed;
        Ok(())
    }

    /// Advance the state machine by one fixed step
    pub fn tick<B: MotionBody + ?Sized>(&mut self, body: &mut B) {
        if self.phase == PatrolPhase::Moving {
            self.update_moving(body);
        }
        if self.phase == PatrolPhase::Arrived {
            self.aim(body);
        }
        if self.phase == PatrolPhase::Rotating {
            self.update_rotating(body);
        }
        if self.phase == PatrolPhase::Advancing {
            self.advance(body);
        }
    }

    fn update_moving<B: MotionBody + ?Sized>(&mut self, body: &mut B) {
        if self.config.speed != self.applied_speed {
            let velocity = if self.applied_speed > 0.0 {
                body.velocity() * (self.config.speed / self.applied_speed)
            } else {
                self.direction.normalize_or_zero() * self.config.speed
            };
            body.set_velocity(velocity);
            self.applied_speed = self.config.speed;
        }

        let distance_squared = (body.position() - self.target).length_squared();
        let precision = self.config.distance_precision;

        // Growing distance means the last step jumped past the target
        if distance_squared < precision * precision || distance_squared > self.last_distance_squared {
            self.last_distance_squared = f32::MAX;
            body.set_velocity(Vec3::ZERO);
            body.set_position(self.target);
            self.events.push(PatrolEvent::Arrived {
                waypoint: self.target,
            });
            log::trace!("Reached waypoint {}", self.target);
            self.phase = PatrolPhase::Arrived;
        } else {
            self.last_distance_squared = distance_squared;
        }
    }

    fn aim<B: MotionBody + ?Sized>(&mut self, body: &mut B) {
        let Some(next) = self.path.peek() else {
            self.phase = PatrolPhase::Idle;
            return;
        };
        self.direction = next - body.position();
        self.heading = look_rotation(self.direction).unwrap_or_else(|| body.rotation());
        self.blend = 0.0;
        self.phase = PatrolPhase::Rotating;
    }

    fn update_rotating<B: MotionBody + ?Sized>(&mut self, body: &mut B) {
        if !self.config.rotate {
            body.set_rotation(self.heading);
            self.phase = PatrolPhase::Advancing;
            return;
        }

        self.blend = (self.blend + self.config.rotation_speed).min(1.0);
        let current = body.rotation();

        if current.angle_between(self.heading).to_degrees() < self.config.rotation_precision
            || self.blend >= 1.0
        {
            body.set_rotation(self.heading);
            self.blend = 0.0;
            self.phase = PatrolPhase::Advancing;
        } else {
            body.set_rotation(current.slerp(self.heading, self.blend));
        }
    }

    fn advance<B: MotionBody + ?Sized>(&mut self, body: &mut B) {
        let Some((target, restarted)) = self.path.next_target() else {
            self.phase = PatrolPhase::Idle;
            return;
        };
        if restarted {
            log::trace!("Patrol lap finished, restarting");
            self.events.push(PatrolEvent::LoopRestarted);
        }

        self.target = target;
        self.direction = target - body.position();
        body.set_velocity(self.direction.normalize_or_zero() * self.config.speed);
        self.applied_speed = self.config.speed;
        self.last_distance_squared = f32::MAX;
        self.events.push(PatrolEvent::Departed { target });
        self.phase = PatrolPhase::Moving;
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<PatrolEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[PatrolEvent] {
        &self.events
    }

    pub fn config(&self) -> &PatrolConfig {
        &self.config
    }

    pub fn phase(&self) -> PatrolPhase {
        self.phase
    }

    /// Current target, meaningful while moving
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Orientation the body is turning toward
    pub fn heading(&self) -> Quat {
        self.heading
    }

    pub fn path(&self) -> &PatrolPath {
        &self.path
    }

    pub fn is_patrolling(&self) -> bool {
        self.phase != PatrolPhase::Idle
    }
}
