//! Per-level best results
//!
//! Tracks the fastest completion and the most files collected for every level.
//! The file total gates which levels are unlocked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Best results for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Fastest completion, in seconds
    pub best_time: f64,
    /// Most files collected in a single completion
    pub files_collected: u32,
    /// Whether `best_time` is at or under the level's author time
    pub beat_author_time: bool,
}

/// Records keyed by level name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRecords {
    pub entries: BTreeMap<String, LevelRecord>,
}

impl LevelRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, level: &str) -> Option<&LevelRecord> {
        self.entries.get(level)
    }

    /// Check if a time would beat the current best for a level
    pub fn qualifies(&self, level: &str, time: f64) -> bool {
        self.entries
            .get(level)
            .map(|record| time < record.best_time)
            .unwrap_or(true)
    }

    /// Record a completion. Returns true if it set a new best time.
    ///
    /// The file count is kept at its maximum independently of the time, so a
    /// slow run that found more files still counts them.
    pub fn submit(&mut self, level: &str, time: f64, files_collected: u32, author_time: f64) -> bool {
        let beats_author = author_time > 0.0 && time <= author_time;
        match self.entries.get_mut(level) {
            Some(record) => {
                record.files_collected = record.files_collected.max(files_collected);
                if time < record.best_time {
                    record.best_time = time;
                    record.beat_author_time |= beats_author;
                    true
                } else {
                    false
                }
            }
            None => {
                self.entries.insert(
                    level.to_owned(),
                    LevelRecord {
                        best_time: time,
                        files_collected,
                        beat_author_time: beats_author,
                    },
                );
                true
            }
        }
    }

    /// Sum of best file counts over all levels
    pub fn total_collected_files(&self) -> u32 {
        self.entries.values().map(|r| r.files_collected).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_submission_is_best() {
        let mut records = LevelRecords::new();
        assert!(records.qualifies("a", 30.0));
        assert!(records.submit("a", 30.0, 1, 25.0));

        let record = records.get("a").unwrap();
        assert_eq!(record.best_time, 30.0);
        assert!(!record.beat_author_time);
    }

    #[test]
    fn test_slower_run_keeps_time_but_counts_files() {
        let mut records = LevelRecords::new();
        records.submit("a", 20.0, 1, 0.0);
        assert!(!records.qualifies("a", 25.0));
        assert!(!records.submit("a", 25.0, 3, 0.0));

        let record = records.get("a").unwrap();
        assert_eq!(record.best_time, 20.0);
        assert_eq!(record.files_collected, 3);
    }

    #[test]
    fn test_author_time() {
        let mut records = LevelRecords::new();
        records.submit("a", 30.0, 0, 25.0);
        assert!(records.submit("a", 24.5, 0, 25.0));
        assert!(records.get("a").unwrap().beat_author_time);

        // No author time set: never counts as beaten
        records.submit("b", 1.0, 0, 0.0);
        assert!(!records.get("b").unwrap().beat_author_time);
    }

    #[test]
    fn test_total_collected_files() {
        let mut records = LevelRecords::new();
        assert!(records.is_empty());
        records.submit("a", 10.0, 2, 0.0);
        records.submit("b", 10.0, 3, 0.0);
        records.submit("a", 12.0, 1, 0.0);
        assert_eq!(records.total_collected_files(), 5);
    }
}
