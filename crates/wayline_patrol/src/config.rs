//! Patrol configuration

use crate::error::{PatrolError, Result};
use serde::{Deserialize, Serialize};

/// Per-agent patrol tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Travel speed in units per second
    pub speed: f32,

    /// Distance under which a waypoint counts as reached
    pub distance_precision: f32,

    /// Whether the agent turns toward each waypoint before leaving
    pub rotate: bool,

    /// Growth of the rotation blend factor per tick
    pub rotation_speed: f32,

    /// Angle in degrees under which the turn counts as done
    pub rotation_precision: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            distance_precision: 0.01,
            rotate: true,
            rotation_speed: 0.001,
            rotation_precision: 1.0,
        }
    }
}

impl PatrolConfig {
    /// Configuration that skips the turning phase
    pub fn without_rotation() -> Self {
        Self {
            rotate: false,
            ..Default::default()
        }
    }

    /// Set speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set arrival precision
    pub fn with_distance_precision(mut self, precision: f32) -> Self {
        self.distance_precision = precision;
        self
    }

    /// Set turn rate and precision
    pub fn with_rotation(mut self, speed: f32, precision_degrees: f32) -> Self {
        self.rotate = true;
        self.rotation_speed = speed;
        self.rotation_precision = precision_degrees;
        self
    }

    /// Check every field is usable
    pub fn validate(&self) -> Result<()> {
        validate_speed(self.speed)?;
        if !(self.distance_precision.is_finite() && self.distance_precision > 0.0) {
            return Err(PatrolError::InvalidConfig(format!(
                "distance precision must be positive, got {}",
                self.distance_precision
            )));
        }
        if self.rotate {
            if !(self.rotation_speed.is_finite() && self.rotation_speed > 0.0) {
                return Err(PatrolError::InvalidConfig(format!(
                    "rotation speed must be positive, got {}",
                    self.rotation_speed
                )));
            }
            if !(self.rotation_precision.is_finite() && self.rotation_precision >= 0.0) {
                return Err(PatrolError::InvalidConfig(format!(
                    "rotation precision must not be negative, got {}",
                    self.rotation_precision
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_speed(speed: f32) -> Result<()> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(())
    } else {
        Err(PatrolError::InvalidConfig(format!(
            "speed must be finite and not negative, got {}",
            speed
        )))
    }
}

/// Fixed-step settings for a [`PatrolWorld`](crate::world::PatrolWorld)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed timestep in seconds
    pub timestep: f32,

    /// Maximum number of ticks run by one update
    pub max_substeps: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 50.0,
            max_substeps: 8,
        }
    }
}

impl WorldConfig {
    /// Set timestep
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Set substep cap
    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(PatrolError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(PatrolError::InvalidConfig("max_substeps must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PatrolConfig::default().validate().is_ok());
        assert!(PatrolConfig::without_rotation().validate().is_ok());
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_speed() {
        assert!(PatrolConfig::default().with_speed(-1.0).validate().is_err());
        assert!(PatrolConfig::default().with_speed(f32::NAN).validate().is_err());
        assert!(PatrolConfig::default().with_speed(0.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_precision() {
        let config = PatrolConfig::default().with_distance_precision(0.0);
        assert!(matches!(config.validate(), Err(PatrolError::InvalidConfig(_))));
    }

    #[test]
    fn test_rotation_fields_ignored_when_disabled() {
        let mut config = PatrolConfig::without_rotation();
        config.rotation_speed = -3.0;
        assert!(config.validate().is_ok());

        config.rotate = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_world_config() {
        assert!(WorldConfig::default().with_timestep(0.0).validate().is_err());
        assert!(WorldConfig::default().with_max_substeps(0).validate().is_err());
        assert!(WorldConfig::default().with_timestep(0.1).with_max_substeps(2).validate().is_ok());
    }
}
