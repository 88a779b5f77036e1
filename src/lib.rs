//! Byte Racer - top-down arcade racing through polygonal levels
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (geometry, level state, player physics, session)
//! - `persistence`: Level and dialog documents, file I/O
//! - `tuning`: Data-driven physics balance
//! - `records`: Per-level best times and collected files

pub mod persistence;
pub mod records;
pub mod sim;
pub mod tuning;

pub use persistence::{DialogBook, DialogLine, PersistenceError};
pub use records::{LevelRecord, LevelRecords};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame step used by the headless runner (the game itself steps with measured dt)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 10.0;
    /// Thrust acceleration along the heading (units/s²)
    pub const PLAYER_SPEED: f32 = 420.0;
    /// Turning rate (radians/s)
    pub const PLAYER_TURNING_SPEED: f32 = 3.0;
    /// Velocity magnitude cap (units/s)
    pub const PLAYER_MAX_SPEED: f32 = 300.0;
    /// Fraction of velocity left after one second of coasting
    pub const PLAYER_FRICTION: f32 = 0.3;
    /// Health, in seconds of exposure to danger zones
    pub const PLAYER_MAX_HP: f32 = 2.0;
    /// Spawn heading when a level does not override it (pointing up)
    pub const PLAYER_START_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;

    /// Speed kept after reflecting off a wall
    pub const BOUNCE_SLOWDOWN: f32 = 0.6;
    /// Hits shallower than this (radians from the wall surface) slide instead of bounce
    pub const GRAZE_ANGLE: f32 = 0.349_065_85; // 20 degrees
    /// Gap left between player and wall after depenetration
    pub const COLLISION_EPSILON: f32 = 0.01;

    /// Rendered and collided wall thickness
    pub const WALL_THICKNESS: f32 = 8.0;
    /// Pickup radius
    pub const PICKUP_RADIUS: f32 = 10.0;
    /// Seconds a collected pickup takes to shrink away on the map
    pub const PICKUP_DESPAWN_TIME: f32 = 0.3;

    /// Spacing between trail links at rest
    pub const TRAIL_REST_DISTANCE: f32 = 20.0;
    /// Spring stiffness pulling each link toward its leader
    pub const TRAIL_STIFFNESS: f32 = 60.0;
    /// Fraction of link velocity left after one second
    pub const TRAIL_DAMPING: f32 = 0.02;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Format seconds as `MM:SS.CC` (minutes wrap at one hour)
pub fn format_time(time: f64) -> String {
    let time = time.max(0.0);
    format!(
        "{:02}:{:02}.{:02}",
        (time / 60.0) as u64 % 60,
        time as u64 % 60,
        (time * 100.0) as u64 % 100
    )
}
