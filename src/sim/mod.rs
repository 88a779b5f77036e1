//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. No rendering, input polling or audio:
//! - Advanced once per frame with that frame's `dt`
//! - Stable iteration order (authored order of walls, zones, pickups)
//! - Collaborators observe through `GameEvent`s

pub mod geometry;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use geometry::{
    SegmentContact, circle_intersects_polygon, circle_segment_contact, circles_overlap,
    closest_point_on_segment, perpendicular, point_in_polygon, reflect_velocity,
};
pub use level::{Level, Pickup, PickupKind, Wall, WallKind, Zone, ZoneKind};
pub use player::{Player, TrailLink};
pub use state::{ActiveDialog, Completion, GameEvent, GameSession, SessionPhase};
pub use tick::{TickInput, tick};
