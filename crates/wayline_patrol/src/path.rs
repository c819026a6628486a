//! Cyclic patrol paths

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use wayline_graph::WaypointGraph;

/// A snapshot of waypoint positions walked over and over.
///
/// The snapshot is fixed when the path is built; later edits to the source
/// graph do not affect it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolPath {
    /// Full circuit as captured
    waypoints: Vec<Vec3>,
    /// Targets left in the current lap
    remaining: VecDeque<Vec3>,
}

impl PatrolPath {
    /// Create a path from ordered points
    pub fn new<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let waypoints: Vec<Vec3> = points.into_iter().collect();
        let remaining = waypoints.iter().copied().collect();
        Self {
            waypoints,
            remaining,
        }
    }

    /// Snapshot a graph's node positions in insertion order
    pub fn from_graph(graph: &WaypointGraph) -> Self {
        Self::new(graph.positions())
    }

    /// Take the next target, starting a new lap when the current one is used
    /// up. The flag is `true` when a new lap was started.
    pub fn next_target(&mut self) -> Option<(Vec3, bool)> {
        let mut restarted = false;
        if self.remaining.is_empty() {
            if self.waypoints.is_empty() {
                return None;
            }
            self.restart();
            restarted = true;
        }
        self.remaining.pop_front().map(|target| (target, restarted))
    }

    /// Target that [`next_target`](Self::next_target) would return
    pub fn peek(&self) -> Option<Vec3> {
        self.remaining
            .front()
            .or_else(|| self.waypoints.first())
            .copied()
    }

    /// Refill the current lap from the snapshot
    pub fn restart(&mut self) {
        self.remaining = self.waypoints.iter().copied().collect();
    }

    /// The captured circuit
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Targets left in the current lap
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Length of one full lap, including the leg back to the start
    pub fn loop_length(&self) -> f32 {
        let n = self.waypoints.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| self.waypoints[i].distance(self.waypoints[(i + 1) % n]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayline_graph::Color;

    #[test]
    fn test_empty_path() {
        let mut path = PatrolPath::new(Vec::<Vec3>::new());
        assert!(path.is_empty());
        assert_eq!(path.next_target(), None);
        assert_eq!(path.peek(), None);
    }

    #[test]
    fn test_cycles_forever() {
        let a = Vec3::ZERO;
        let b = Vec3::X;
        let mut path = PatrolPath::new([a, b]);

        assert_eq!(path.next_target(), Some((a, false)));
        assert_eq!(path.next_target(), Some((b, false)));
        assert_eq!(path.peek(), Some(a));
        assert_eq!(path.next_target(), Some((a, true)));
        assert_eq!(path.next_target(), Some((b, false)));
        assert_eq!(path.remaining(), 0);
    }

    #[test]
    fn test_snapshot_is_independent_of_graph() {
        let mut graph = WaypointGraph::from_positions([Vec3::ZERO, Vec3::X, Vec3::Z], Color::WHITE);
        let path = PatrolPath::from_graph(&graph);

        graph.clear_nodes();

        assert_eq!(path.waypoints(), &[Vec3::ZERO, Vec3::X, Vec3::Z]);
    }

    #[test]
    fn test_loop_length() {
        let path = PatrolPath::new([Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 0.0)]);
        assert!((path.loop_length() - 12.0).abs() < 1e-5);
        assert_eq!(PatrolPath::new([Vec3::ONE]).loop_length(), 0.0);
    }
}
