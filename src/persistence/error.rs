//! Load/save failures
//!
//! None of these are recoverable where they occur; they propagate to whoever
//! asked for the file (usually startup, which reports and exits).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Which way a file was being opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Read => f.write_str("reading"),
            Direction::Write => f.write_str("writing"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to open {} for {direction}: {source}", .path.display())]
    Io {
        path: PathBuf,
        direction: Direction,
        #[source]
        source: io::Error,
    },
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{entity} is missing `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("{entity} has an unusable `{field}`: {reason}")]
    InvalidValue {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },
    #[error("unknown {entity} kind {code}")]
    UnknownKind { entity: &'static str, code: i64 },
    #[error("level format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

impl PersistenceError {
    pub fn io(path: impl AsRef<Path>, direction: Direction, source: io::Error) -> Self {
        PersistenceError::Io {
            path: path.as_ref().to_path_buf(),
            direction,
            source,
        }
    }
}
