//! Data-driven physics balance
//!
//! Defaults mirror `consts`; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{Direction, PersistenceError};

/// Simulation parameters shared by every level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_radius: f32,
    /// Thrust acceleration (units/s²)
    pub player_speed: f32,
    /// Radians per second
    pub turning_speed: f32,
    pub max_speed: f32,
    /// Velocity fraction left after one second
    pub friction: f32,
    /// Health in seconds of danger exposure
    pub max_health: f32,
    pub bounce_slowdown: f32,
    /// Radians from the wall surface below which hits slide
    pub graze_angle: f32,
    pub collision_epsilon: f32,
    pub wall_thickness: f32,
    pub pickup_radius: f32,
    pub trail_rest_distance: f32,
    pub trail_stiffness: f32,
    /// Link velocity fraction left after one second
    pub trail_damping: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            turning_speed: PLAYER_TURNING_SPEED,
            max_speed: PLAYER_MAX_SPEED,
            friction: PLAYER_FRICTION,
            max_health: PLAYER_MAX_HP,
            bounce_slowdown: BOUNCE_SLOWDOWN,
            graze_angle: GRAZE_ANGLE,
            collision_epsilon: COLLISION_EPSILON,
            wall_thickness: WALL_THICKNESS,
            pickup_radius: PICKUP_RADIUS,
            trail_rest_distance: TRAIL_REST_DISTANCE,
            trail_stiffness: TRAIL_STIFFNESS,
            trail_damping: TRAIL_DAMPING,
        }
    }
}

impl Tuning {
    /// Distance at which the player touches a wall's centerline
    #[inline]
    pub fn wall_reach(&self) -> f32 {
        self.player_radius + self.wall_thickness / 2.0
    }

    pub fn from_json_str(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| PersistenceError::io(path, Direction::Read, source))?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}
