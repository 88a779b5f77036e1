//! Dialog scripts
//!
//! One JSON file maps each level name to its dialog sequences. A level's
//! sequences are either an array, or an object keyed by sequence index.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{Direction, PersistenceError};

/// One line of a dialog sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogLine {
    #[serde(rename = "name")]
    pub speaker: String,
    #[serde(rename = "msg", alias = "message")]
    pub message: String,
}

impl DialogLine {
    pub fn new(speaker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            message: message.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SequenceList {
    Ordered(Vec<Vec<DialogLine>>),
    Keyed(BTreeMap<String, Vec<DialogLine>>),
}

impl SequenceList {
    fn into_ordered(self) -> Vec<Vec<DialogLine>> {
        match self {
            SequenceList::Ordered(sequences) => sequences,
            SequenceList::Keyed(map) => {
                let mut entries: Vec<_> = map.into_iter().collect();
                entries.sort_by_key(|(key, _)| (key.parse::<u64>().unwrap_or(u64::MAX), key.clone()));
                entries.into_iter().map(|(_, lines)| lines).collect()
            }
        }
    }
}

/// Every dialog sequence, by level name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogBook {
    levels: HashMap<String, Vec<Vec<DialogLine>>>,
}

impl DialogBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sequences for a level
    pub fn insert(&mut self, level: impl Into<String>, sequences: Vec<Vec<DialogLine>>) {
        self.levels.insert(level.into(), sequences);
    }

    /// Sequence `index` of `level`, if it exists
    pub fn sequence(&self, level: &str, index: i32) -> Option<&[DialogLine]> {
        let index = usize::try_from(index).ok()?;
        self.levels
            .get(level)
            .and_then(|sequences| sequences.get(index))
            .map(Vec::as_slice)
    }

    pub fn sequence_count(&self, level: &str) -> usize {
        self.levels.get(level).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, PersistenceError> {
        let raw: HashMap<String, SequenceList> = serde_json::from_str(json)?;
        let levels = raw
            .into_iter()
            .map(|(level, list)| (level, list.into_ordered()))
            .collect();
        Ok(Self { levels })
    }

    /// Read a dialog script file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| PersistenceError::io(path, Direction::Read, source))?;
        let book = Self::from_json_str(&json)?;
        log::info!(
            "Loaded dialogs for {} levels from {}",
            book.levels.len(),
            path.display()
        );
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_sequences() {
        let book = DialogBook::from_json_str(
            r#"{
                "intro": [
                    [{ "name": "OPERATOR", "msg": "Wake up." }, { "name": "YOU", "msg": "..." }],
                    [{ "name": "OPERATOR", "message": "Find the key." }]
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(book.sequence_count("intro"), 2);
        let first = book.sequence("intro", 0).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], DialogLine::new("OPERATOR", "Wake up."));
        assert_eq!(book.sequence("intro", 1).unwrap()[0].message, "Find the key.");
    }

    #[test]
    fn test_keyed_sequences_order_numerically() {
        let book = DialogBook::from_json_str(
            r#"{
                "maze": {
                    "10": [{ "name": "A", "msg": "ten" }],
                    "2": [{ "name": "A", "msg": "two" }],
                    "0": [{ "name": "A", "msg": "zero" }]
                }
            }"#,
        )
        .unwrap();

        let messages: Vec<&str> = (0..3)
            .map(|i| book.sequence("maze", i).unwrap()[0].message.as_str())
            .collect();
        assert_eq!(messages, vec!["zero", "two", "ten"]);
    }

    #[test]
    fn test_missing_sequences() {
        let book = DialogBook::new();
        assert!(book.sequence("nowhere", 0).is_none());
        assert!(book.sequence("nowhere", -1).is_none());
        assert_eq!(book.sequence_count("nowhere"), 0);
    }

    #[test]
    fn test_malformed_script_is_parse_error() {
        let err = DialogBook::from_json_str(r#"{ "intro": [[{ "name": "A" }]] }"#).unwrap_err();
        assert!(matches!(err, PersistenceError::Parse(_)));
    }
}
