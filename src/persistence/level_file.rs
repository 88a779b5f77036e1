//! Level document format
//!
//! One JSON document per level. Kinds are integer tags:
//! walls {Wall=0, Door=1}, zones {End=0, DialogTrigger=1, OneWay=2, Danger=3},
//! pickups {Key=0, File=1}. Runtime timers are never written.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::dialogs::DialogLine;
use super::error::{Direction, PersistenceError};
use crate::sim::level::{Level, Pickup, PickupKind, Wall, WallKind, Zone, ZoneKind};

/// Newest level format this build reads and the one it writes
pub const LEVEL_FORMAT_VERSION: u32 = 1;

/// `on_unlock_dialog` value written for "no dialog" (any negative value reads as none)
const NO_DIALOG: i32 = -1;

fn default_version() -> u32 {
    LEVEL_FORMAT_VERSION
}

fn no_dialog() -> i32 {
    NO_DIALOG
}

/// On-disk shape of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    pub files_required: u16,
    #[serde(default)]
    pub author_time: f64,
    pub start_position: Vec2,
    pub start_angle: f32,
    #[serde(default = "no_dialog")]
    pub on_unlock_dialog: i32,
    #[serde(default)]
    pub walls: Vec<WallDocument>,
    #[serde(default)]
    pub zones: Vec<ZoneDocument>,
    #[serde(default)]
    pub pickups: Vec<PickupDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dialogs: Vec<Vec<DialogLineDocument>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallDocument {
    pub kind: i64,
    pub points: Vec<Vec2>,
    /// Doors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDocument {
    pub kind: i64,
    pub points: Vec<Vec2>,
    /// Dialog index (DialogTrigger) or push angle in radians (OneWay)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ZoneValue>,
    /// OneWay only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f32>,
}

/// Zone payload number; the level editor writes integers and floats alike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneValue {
    Int(i64),
    Float(f64),
}

impl ZoneValue {
    fn as_f32(self) -> f32 {
        match self {
            ZoneValue::Int(i) => i as f32,
            ZoneValue::Float(f) => f as f32,
        }
    }

    fn as_dialog_index(self) -> Result<i32, PersistenceError> {
        let invalid = |reason: String| PersistenceError::InvalidValue {
            entity: "dialog trigger zone",
            field: "value",
            reason,
        };
        match self {
            ZoneValue::Int(i) => {
                i32::try_from(i).map_err(|_| invalid(format!("{i} is out of range")))
            }
            ZoneValue::Float(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Ok(f as i32),
            ZoneValue::Float(f) => Err(invalid(format!("{f} is not an integer"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupDocument {
    pub kind: i64,
    pub x: f32,
    pub y: f32,
    pub id: i32,
}

/// Embedded dialog line; level files spell the text key `message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogLineDocument {
    pub name: String,
    #[serde(alias = "msg")]
    pub message: String,
}

impl From<&DialogLine> for DialogLineDocument {
    fn from(line: &DialogLine) -> Self {
        Self {
            name: line.speaker.clone(),
            message: line.message.clone(),
        }
    }
}

impl From<DialogLineDocument> for DialogLine {
    fn from(doc: DialogLineDocument) -> Self {
        DialogLine::new(doc.name, doc.message)
    }
}

impl WallDocument {
    fn from_wall(wall: &Wall) -> Self {
        Self {
            kind: wall.kind.code(),
            points: wall.points.clone(),
            key_id: match wall.kind {
                WallKind::Door { key_id } => Some(key_id),
                WallKind::Wall => None,
            },
        }
    }

    fn into_wall(self) -> Result<Wall, PersistenceError> {
        let kind = match self.kind {
            0 => WallKind::Wall,
            1 => WallKind::Door {
                key_id: self.key_id.ok_or(PersistenceError::MissingField {
                    entity: "door",
                    field: "key_id",
                })?,
            },
            code => {
                return Err(PersistenceError::UnknownKind {
                    entity: "wall",
                    code,
                });
            }
        };
        Ok(Wall::new(kind, self.points))
    }
}

impl ZoneDocument {
    fn from_zone(zone: &Zone) -> Self {
        let (value, power) = match zone.kind {
            ZoneKind::End | ZoneKind::Danger => (None, None),
            ZoneKind::DialogTrigger { dialog_index } => {
                (Some(ZoneValue::Int(i64::from(dialog_index))), None)
            }
            ZoneKind::OneWay { angle, power } => {
                (Some(ZoneValue::Float(f64::from(angle))), Some(power))
            }
        };
        Self {
            kind: zone.kind.code(),
            points: zone.points.clone(),
            value,
            power,
        }
    }

    fn into_zone(self) -> Result<Zone, PersistenceError> {
        let kind = match self.kind {
            0 => ZoneKind::End,
            1 => ZoneKind::DialogTrigger {
                dialog_index: self
                    .value
                    .ok_or(PersistenceError::MissingField {
                        entity: "dialog trigger zone",
                        field: "value",
                    })?
                    .as_dialog_index()?,
            },
            2 => ZoneKind::OneWay {
                angle: self
                    .value
                    .ok_or(PersistenceError::MissingField {
                        entity: "one-way zone",
                        field: "value",
                    })?
                    .as_f32(),
                power: self.power.ok_or(PersistenceError::MissingField {
                    entity: "one-way zone",
                    field: "power",
                })?,
            },
            3 => ZoneKind::Danger,
            code => {
                return Err(PersistenceError::UnknownKind {
                    entity: "zone",
                    code,
                });
            }
        };
        Ok(Zone::new(kind, self.points))
    }
}

impl PickupDocument {
    fn from_pickup(pickup: &Pickup) -> Self {
        Self {
            kind: pickup.kind.code(),
            x: pickup.position.x,
            y: pickup.position.y,
            id: pickup.id,
        }
    }

    fn into_pickup(self) -> Result<Pickup, PersistenceError> {
        let kind = match self.kind {
            0 => PickupKind::Key,
            1 => PickupKind::File,
            code => {
                return Err(PersistenceError::UnknownKind {
                    entity: "pickup",
                    code,
                });
            }
        };
        Ok(Pickup::new(kind, Vec2::new(self.x, self.y), self.id))
    }
}

impl Level {
    /// Build a level from its document; doors are moved to the front of the wall list
    pub fn from_document(doc: LevelDocument) -> Result<Self, PersistenceError> {
        if doc.version > LEVEL_FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: doc.version,
                supported: LEVEL_FORMAT_VERSION,
            });
        }

        let mut level = Level::new(doc.name, doc.files_required);
        level.author_time = doc.author_time;
        level.start_position = doc.start_position;
        level.start_angle = doc.start_angle;
        level.on_unlock_dialog = (doc.on_unlock_dialog >= 0).then_some(doc.on_unlock_dialog);

        for wall in doc.walls {
            level.add_wall(wall.into_wall()?);
        }
        level.zones = doc
            .zones
            .into_iter()
            .map(ZoneDocument::into_zone)
            .collect::<Result<_, _>>()?;
        level.pickups = doc
            .pickups
            .into_iter()
            .map(PickupDocument::into_pickup)
            .collect::<Result<_, _>>()?;
        level.dialogs = doc
            .dialogs
            .into_iter()
            .map(|sequence| sequence.into_iter().map(DialogLine::from).collect())
            .collect();

        Ok(level)
    }

    /// Inverse of `from_document`
    ///
    /// Doors are written in the order they were authored, so a reload puts them
    /// back in the same collision order.
    pub fn to_document(&self) -> LevelDocument {
        let doors = self.walls.iter().filter(|w| w.is_door()).rev();
        let plain = self.walls.iter().filter(|w| !w.is_door());

        LevelDocument {
            version: LEVEL_FORMAT_VERSION,
            name: self.name.clone(),
            files_required: self.files_required,
            author_time: self.author_time,
            start_position: self.start_position,
            start_angle: self.start_angle,
            on_unlock_dialog: self.on_unlock_dialog.unwrap_or(NO_DIALOG),
            walls: doors.chain(plain).map(WallDocument::from_wall).collect(),
            zones: self.zones.iter().map(ZoneDocument::from_zone).collect(),
            pickups: self.pickups.iter().map(PickupDocument::from_pickup).collect(),
            dialogs: self
                .dialogs
                .iter()
                .map(|sequence| sequence.iter().map(DialogLineDocument::from).collect())
                .collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, PersistenceError> {
        let doc: LevelDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    pub fn to_json_string(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Read a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| PersistenceError::io(path, Direction::Read, source))?;
        let level = Self::from_json_str(&json)?;
        log::debug!(
            "Loaded level '{}' from {} ({} walls, {} zones, {} pickups)",
            level.name,
            path.display(),
            level.walls.len(),
            level.zones.len(),
            level.pickups.len()
        );
        Ok(level)
    }

    /// Write a level file, replacing any existing one
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        std::fs::write(path, json)
            .map_err(|source| PersistenceError::io(path, Direction::Write, source))?;
        log::info!("Level '{}' saved to {}", self.name, path.display());
        Ok(())
    }
}

/// File name the level editor uses for the level at `index`
pub fn level_file_name(index: usize) -> String {
    format!("level_{index}.json")
}

/// Load every `*.json` file in `dir`, ordered by file name
///
/// Numbered names sort numerically, so `level_10.json` follows `level_9.json`.
pub fn load_level_dir(dir: impl AsRef<Path>) -> Result<Vec<Level>, PersistenceError> {
    let dir = dir.as_ref();
    let entries =
        std::fs::read_dir(dir).map_err(|source| PersistenceError::io(dir, Direction::Read, source))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PersistenceError::io(dir, Direction::Read, source))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort_by_key(|path| level_sort_key(path));

    let levels = paths
        .iter()
        .map(Level::load)
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Loaded {} levels from {}", levels.len(), dir.display());
    Ok(levels)
}

/// (trailing number in the stem, full name) so numbered files sort numerically
fn level_sort_key(path: &Path) -> (u64, PathBuf) {
    let number = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| {
            let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
            stem[stem.len() - digits..].parse().ok()
        })
        .unwrap_or(u64::MAX);
    (number, path.to_path_buf())
}
