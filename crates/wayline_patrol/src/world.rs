//! Patrol world - fixed-step container for patrolling agents

use crate::body::KinematicBody;
use crate::config::{PatrolConfig, WorldConfig};
use crate::controller::{PatrolController, PatrolEvent};
use crate::error::{PatrolError, Result};
use crate::path::PatrolPath;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wayline_graph::WaypointGraph;

/// Handle to an agent in a [`PatrolWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl AgentId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A controller paired with the body it drives
#[derive(Debug, Clone)]
pub struct PatrolAgent {
    pub controller: PatrolController,
    pub body: KinematicBody,
}

/// All agents of a simulation, stepped with a fixed timestep
pub struct PatrolWorld {
    config: WorldConfig,

    /// Agents by handle, iterated in spawn order
    agents: BTreeMap<AgentId, PatrolAgent>,

    next_id: u64,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,

    /// Events not drained yet
    events: Vec<(AgentId, PatrolEvent)>,
}

impl PatrolWorld {
    /// Create an empty world
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            agents: BTreeMap::new(),
            next_id: 1,
            accumulated_time: 0.0,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ==================== Agents ====================

    /// Add an agent resting at `position` and start it on `path`
    pub fn spawn(&mut self, position: Vec3, config: PatrolConfig, path: PatrolPath) -> Result<AgentId> {
        let mut controller = PatrolController::new(config)?;
        controller.start(path);

        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.insert(
            id,
            PatrolAgent {
                controller,
                body: KinematicBody::at(position),
            },
        );
        log::debug!("Spawned patrol agent {:?}", id);
        Ok(id)
    }

    /// Spawn an agent patrolling a snapshot of `graph`
    pub fn spawn_on_graph(&mut self, position: Vec3, config: PatrolConfig, graph: &WaypointGraph) -> Result<AgentId> {
        self.spawn(position, config, PatrolPath::from_graph(graph))
    }

    /// Remove an agent
    pub fn despawn(&mut self, id: AgentId) -> Option<PatrolAgent> {
        self.agents.remove(&id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&PatrolAgent> {
        self.agents.get(&id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut PatrolAgent> {
        self.agents.get_mut(&id)
    }

    /// Put an agent on a new path
    pub fn restart_agent(&mut self, id: AgentId, path: PatrolPath) -> Result<()> {
        let agent = self.agents.get_mut(&id).ok_or(PatrolError::AgentNotFound(id))?;
        agent.controller.start(path);
        Ok(())
    }

    /// Change an agent's speed
    pub fn set_agent_speed(&mut self, id: AgentId, speed: f32) -> Result<()> {
        self.agents
            .get_mut(&id)
            .ok_or(PatrolError::AgentNotFound(id))?
            .controller
            .set_speed(speed)
    }

    pub fn agents(&self) -> impl Iterator<Item = (AgentId, &PatrolAgent)> {
        self.agents.iter().map(|(id, agent)| (*id, agent))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    // ==================== Simulation ====================

    /// Advance by a frame's worth of time. Returns the number of fixed ticks run.
    ///
    /// Time beyond `max_substeps` ticks stays accumulated for later frames.
    pub fn update(&mut self, delta_time: f32) -> u32 {
        self.accumulated_time += delta_time;

        let mut steps = 0;
        while self.accumulated_time >= self.config.timestep && steps < self.config.max_substeps {
            self.step();
            self.accumulated_time -= self.config.timestep;
            steps += 1;
        }
        steps
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self) {
        let dt = self.config.timestep;
        for (id, agent) in self.agents.iter_mut() {
            agent.controller.tick(&mut agent.body);
            agent.body.integrate(dt);
            self.events
                .extend(agent.controller.drain_events().into_iter().map(|event| (*id, event)));
        }
    }

    /// Time waiting to be consumed by future ticks
    pub fn accumulated_time(&self) -> f32 {
        self.accumulated_time
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<(AgentId, PatrolEvent)> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PatrolWorld {
        PatrolWorld::new(WorldConfig::default().with_timestep(0.25).with_max_substeps(4)).unwrap()
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(PatrolWorld::new(WorldConfig::default().with_max_substeps(0)).is_err());
    }

    #[test]
    fn test_update_counts_ticks() {
        let mut world = world();
        assert_eq!(world.update(0.5), 2);
        assert_eq!(world.update(0.125), 0);
        assert_eq!(world.update(0.125), 1);
    }

    #[test]
    fn test_update_caps_substeps() {
        let mut world = world();
        assert_eq!(world.update(2.0), 4);
        assert_eq!(world.accumulated_time(), 1.0);
        assert_eq!(world.update(0.0), 4);
        assert_eq!(world.accumulated_time(), 0.0);
    }

    #[test]
    fn test_unknown_agent() {
        let mut world = world();
        let id = world.spawn(Vec3::ZERO, PatrolConfig::default(), PatrolPath::default()).unwrap();
        world.despawn(id);

        assert_eq!(
            world.restart_agent(id, PatrolPath::default()),
            Err(PatrolError::AgentNotFound(id))
        );
        assert_eq!(world.set_agent_speed(id, 1.0), Err(PatrolError::AgentNotFound(id)));
        assert!(world.is_empty());
    }

    #[test]
    fn test_events_tagged_with_agent() {
        let mut world = world();
        let a = world
            .spawn(Vec3::ZERO, PatrolConfig::without_rotation(), PatrolPath::new([Vec3::X]))
            .unwrap();
        let b = world
            .spawn(Vec3::ZERO, PatrolConfig::without_rotation(), PatrolPath::new([Vec3::Z]))
            .unwrap();

        world.step();
        let events = world.drain_events();

        assert_eq!(
            events,
            vec![
                (a, PatrolEvent::Departed { target: Vec3::X }),
                (b, PatrolEvent::Departed { target: Vec3::Z }),
            ]
        );
        assert!(world.drain_events().is_empty());
    }
}
