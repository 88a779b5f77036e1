//! Level layout and its per-session trigger state
//!
//! A level is immutable after load except for the trigger timers on walls,
//! zones and pickups, which `reset_runtime` clears whenever the level is
//! (re)entered.

use glam::Vec2;

use crate::consts::*;
use crate::persistence::DialogLine;

/// Wall flavours. Doors open permanently once the matching key is carried into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallKind {
    Wall,
    Door { key_id: u8 },
}

impl WallKind {
    /// Integer tag used by the level format
    pub fn code(&self) -> i64 {
        match self {
            WallKind::Wall => 0,
            WallKind::Door { .. } => 1,
        }
    }
}

/// A polyline obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub kind: WallKind,
    pub points: Vec<Vec2>,
    /// Seconds since a door was opened (None = closed)
    pub time_since_trigger: Option<f32>,
}

impl Wall {
    pub fn new(kind: WallKind, points: Vec<Vec2>) -> Self {
        Self {
            kind,
            points,
            time_since_trigger: None,
        }
    }

    pub fn is_door(&self) -> bool {
        matches!(self.kind, WallKind::Door { .. })
    }

    /// Open doors no longer collide or render
    pub fn is_open(&self) -> bool {
        self.time_since_trigger.is_some()
    }

    /// Consecutive point pairs; empty for walls with fewer than two points
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Zone behaviour and its payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneKind {
    /// Finish line
    End,
    /// Opens a dialog sequence of the current level the first time it is touched
    DialogTrigger { dialog_index: i32 },
    /// Pushes anything inside along `angle` (radians), scaled by `power`
    OneWay { angle: f32, power: f32 },
    /// Drains health while overlapped
    Danger,
}

impl ZoneKind {
    /// Integer tag used by the level format
    pub fn code(&self) -> i64 {
        match self {
            ZoneKind::End => 0,
            ZoneKind::DialogTrigger { .. } => 1,
            ZoneKind::OneWay { .. } => 2,
            ZoneKind::Danger => 3,
        }
    }
}

/// A polygonal trigger region
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub kind: ZoneKind,
    pub points: Vec<Vec2>,
    /// Seconds since first triggered (None = untouched)
    pub time_since_trigger: Option<f32>,
}

impl Zone {
    pub fn new(kind: ZoneKind, points: Vec<Vec2>) -> Self {
        Self {
            kind,
            points,
            time_since_trigger: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Key,
    File,
}

impl PickupKind {
    /// Integer tag used by the level format
    pub fn code(&self) -> i64 {
        match self {
            PickupKind::Key => 0,
            PickupKind::File => 1,
        }
    }
}

/// A collectible
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub position: Vec2,
    /// Matched against `WallKind::Door::key_id` (0 = unset)
    pub id: i32,
    /// Seconds since collected (None = still on the map)
    pub time_since_pickup: Option<f32>,
}

impl Pickup {
    pub fn new(kind: PickupKind, position: Vec2, id: i32) -> Self {
        Self {
            kind,
            position,
            id,
            time_since_pickup: None,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.time_since_pickup.is_some()
    }

    /// On-map radius: full until collected, then shrinking to nothing
    pub fn display_radius(&self, base: f32) -> f32 {
        match self.time_since_pickup {
            None => base,
            Some(t) if t <= PICKUP_DESPAWN_TIME => {
                base * (PICKUP_DESPAWN_TIME - t) / PICKUP_DESPAWN_TIME
            }
            Some(_) => 0.0,
        }
    }
}

/// A playable level
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub name: String,
    /// Collected files needed (across all levels) before this one unlocks
    pub files_required: u16,
    /// Reference completion time in seconds
    pub author_time: f64,
    pub start_position: Vec2,
    pub start_angle: f32,
    /// Dialog sequence shown the first time the level is entered
    pub on_unlock_dialog: Option<i32>,
    /// Doors first (latest-loaded door at the front), then plain walls in authored order
    pub walls: Vec<Wall>,
    pub zones: Vec<Zone>,
    pub pickups: Vec<Pickup>,
    /// Dialog sequences stored in the level file itself
    pub dialogs: Vec<Vec<DialogLine>>,
    /// Whether `on_unlock_dialog` was already shown this run
    pub did_initial_dialog: bool,
}

impl Level {
    pub fn new(name: impl Into<String>, files_required: u16) -> Self {
        Self {
            name: name.into(),
            files_required,
            author_time: 0.0,
            start_position: Vec2::ZERO,
            start_angle: PLAYER_START_ANGLE,
            on_unlock_dialog: None,
            walls: Vec::new(),
            zones: Vec::new(),
            pickups: Vec::new(),
            dialogs: Vec::new(),
            did_initial_dialog: false,
        }
    }

    /// Insert a wall; doors go to the front so they are collision-checked first
    pub fn add_wall(&mut self, wall: Wall) {
        if wall.is_door() {
            self.walls.insert(0, wall);
        } else {
            self.walls.push(wall);
        }
    }

    /// Return every wall, zone and pickup to its untouched state
    pub fn reset_runtime(&mut self) {
        for wall in &mut self.walls {
            wall.time_since_trigger = None;
        }
        for zone in &mut self.zones {
            zone.time_since_trigger = None;
        }
        for pickup in &mut self.pickups {
            pickup.time_since_pickup = None;
        }
    }

    /// Count up zone and pickup timers that have started
    ///
    /// Door timers advance during the player's collision pass.
    pub fn advance_timers(&mut self, dt: f32) {
        for zone in &mut self.zones {
            if let Some(t) = zone.time_since_trigger.as_mut() {
                *t += dt;
            }
        }
        for pickup in &mut self.pickups {
            if let Some(t) = pickup.time_since_pickup.as_mut() {
                *t += dt;
            }
        }
    }

    /// Number of File pickups in the level
    pub fn file_count(&self) -> u32 {
        self.pickups
            .iter()
            .filter(|p| p.kind == PickupKind::File)
            .count() as u32
    }

    /// Number of File pickups collected this session
    pub fn collected_file_count(&self) -> u32 {
        self.pickups
            .iter()
            .filter(|p| p.kind == PickupKind::File && p.is_collected())
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_wall(kind: WallKind) -> Wall {
        Wall::new(kind, vec![Vec2::ZERO, Vec2::new(10.0, 0.0)])
    }

    #[test]
    fn test_doors_are_inserted_first() {
        let mut level = Level::new("doors", 0);
        level.add_wall(segment_wall(WallKind::Wall));
        level.add_wall(segment_wall(WallKind::Door { key_id: 1 }));
        level.add_wall(segment_wall(WallKind::Wall));
        level.add_wall(segment_wall(WallKind::Door { key_id: 2 }));

        let kinds: Vec<WallKind> = level.walls.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WallKind::Door { key_id: 2 },
                WallKind::Door { key_id: 1 },
                WallKind::Wall,
                WallKind::Wall,
            ]
        );
    }

    #[test]
    fn test_short_walls_have_no_segments() {
        let wall = Wall::new(WallKind::Wall, vec![Vec2::ZERO]);
        assert_eq!(wall.segments().count(), 0);

        let wall = Wall::new(WallKind::Wall, vec![Vec2::ZERO, Vec2::X, Vec2::ONE]);
        assert_eq!(wall.segments().count(), 2);
    }

    #[test]
    fn test_reset_runtime_clears_timers() {
        let mut level = Level::new("timers", 0);
        level.add_wall(segment_wall(WallKind::Door { key_id: 1 }));
        level.zones.push(Zone::new(ZoneKind::End, vec![Vec2::ZERO, Vec2::X, Vec2::Y]));
        level.pickups.push(Pickup::new(PickupKind::File, Vec2::ZERO, 0));

        level.walls[0].time_since_trigger = Some(1.0);
        level.zones[0].time_since_trigger = Some(0.0);
        level.pickups[0].time_since_pickup = Some(0.0);
        level.advance_timers(0.5);
        assert_eq!(level.zones[0].time_since_trigger, Some(0.5));
        assert_eq!(level.pickups[0].time_since_pickup, Some(0.5));

        level.reset_runtime();
        assert!(!level.walls[0].is_open());
        assert!(level.zones[0].time_since_trigger.is_none());
        assert!(!level.pickups[0].is_collected());
    }

    #[test]
    fn test_file_counts() {
        let mut level = Level::new("files", 0);
        level.pickups.push(Pickup::new(PickupKind::File, Vec2::ZERO, 0));
        level.pickups.push(Pickup::new(PickupKind::Key, Vec2::ZERO, 3));
        level.pickups.push(Pickup::new(PickupKind::File, Vec2::ZERO, 0));
        level.pickups[2].time_since_pickup = Some(0.0);

        assert_eq!(level.file_count(), 2);
        assert_eq!(level.collected_file_count(), 1);
    }

    #[test]
    fn test_pickup_display_radius_shrinks() {
        let mut pickup = Pickup::new(PickupKind::Key, Vec2::ZERO, 1);
        assert_eq!(pickup.display_radius(10.0), 10.0);
        pickup.time_since_pickup = Some(PICKUP_DESPAWN_TIME / 2.0);
        assert!((pickup.display_radius(10.0) - 5.0).abs() < 0.001);
        pickup.time_since_pickup = Some(1.0);
        assert_eq!(pickup.display_radius(10.0), 0.0);
    }
}
