//! Level and dialog documents
//!
//! Features:
//! - Versioned JSON level format with integer kind tags
//! - Directory loading in file-name order
//! - Dialog scripts keyed by level name

pub mod dialogs;
pub mod error;
pub mod level_file;

pub use dialogs::{DialogBook, DialogLine};
pub use error::{Direction, PersistenceError};
pub use level_file::{
    DialogLineDocument, LEVEL_FORMAT_VERSION, LevelDocument, PickupDocument, WallDocument, ZoneDocument, ZoneValue,
    level_file_name, load_level_dir,
};
