//! Motion body seam
//!
//! The controller never integrates motion itself. It writes a velocity and an
//! orientation to a [`MotionBody`] and only touches the position to snap onto
//! a reached waypoint. Hosts plug in their rigid body; [`KinematicBody`] is the
//! plain integrator used by the world and the tests.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Something the patrol controller can steer
pub trait MotionBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
}

/// Point body with explicit Euler integration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl KinematicBody {
    /// Resting body at a position
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Advance the position by one step
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

impl MotionBody for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

/// Orientation looking along `direction` with +Y up and +Z forward.
///
/// Returns `None` for a zero direction.
pub fn look_rotation(direction: Vec3) -> Option<Quat> {
    let forward = direction.normalize_or_zero();
    if forward == Vec3::ZERO {
        return None;
    }

    let right = Vec3::Y.cross(forward);
    if right.length_squared() < 1e-8 {
        // Looking straight up or down
        return Some(Quat::from_rotation_arc(Vec3::Z, forward));
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Some(Quat::from_mat3(&glam::Mat3::from_cols(right, up, forward)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate() {
        let mut body = KinematicBody::at(Vec3::new(1.0, 0.0, 0.0));
        body.velocity = Vec3::new(2.0, 0.0, -4.0);
        body.integrate(0.5);
        assert_eq!(body.position, Vec3::new(2.0, 0.0, -2.0));
    }

    #[test]
    fn test_look_rotation_forward_is_identity() {
        let rotation = look_rotation(Vec3::Z * 3.0).unwrap();
        assert!(rotation.abs_diff_eq(Quat::IDENTITY, 1e-5));
    }

    #[test]
    fn test_look_rotation_maps_z_to_direction() {
        for dir in [Vec3::X, -Vec3::X, Vec3::new(1.0, 0.5, -2.0), Vec3::Y, -Vec3::Y] {
            let rotation = look_rotation(dir).unwrap();
            let forward = rotation * Vec3::Z;
            assert!(forward.abs_diff_eq(dir.normalize(), 1e-4), "dir {:?} got {:?}", dir, forward);
        }
    }

    #[test]
    fn test_look_rotation_zero() {
        assert!(look_rotation(Vec3::ZERO).is_none());
    }
}
