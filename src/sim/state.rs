//! Level session state
//!
//! Everything a running session mutates lives here: the loaded levels and
//! their runtime timers, the player, the clock, dialog blocking and records.

use std::collections::VecDeque;

use crate::format_time;
use crate::persistence::{DialogBook, DialogLine};
use crate::records::LevelRecords;
use crate::tuning::Tuning;

use super::level::Level;
use super::player::Player;

/// Something collaborators (audio, FX, UI) may react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Pickup index in the current level
    PickupCollected { pickup: usize },
    /// Wall index in the current level
    DoorOpened { wall: usize },
    /// Solid bounce; speed before the hit
    WallHit { speed: f32 },
    DialogRequested { index: i32 },
    LevelCompleted {
        time: f64,
        files_collected: u32,
        files_total: u32,
    },
    /// Level index that just became playable
    LevelUnlocked { level: usize },
    PlayerDied,
    LevelRestarted,
}

/// Session phase for the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No level entered yet
    NotStarted,
    Active,
    /// End zone reached
    Completed,
}

/// The open dialog sequence and the line being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDialog {
    pub index: i32,
    pub line: usize,
}

/// Result latched when the End zone is first reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    pub time: f64,
    pub files_collected: u32,
    pub files_total: u32,
}

/// A play session over a set of levels
#[derive(Debug, Clone)]
pub struct GameSession {
    pub levels: Vec<Level>,
    pub current_level: Option<usize>,
    pub player: Player,
    pub phase: SessionPhase,
    /// Seconds since the level was (re)entered
    pub elapsed_time: f64,
    pub completion: Option<Completion>,
    /// Whether the player touched a Danger zone on the last tick
    pub in_danger: bool,
    pub active_dialog: Option<ActiveDialog>,
    /// Sequences triggered while another one was open
    pub pending_dialogs: VecDeque<i32>,
    pub dialogs: DialogBook,
    pub records: LevelRecords,
    pub tuning: Tuning,
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(levels: Vec<Level>, tuning: Tuning) -> Self {
        Self {
            levels,
            current_level: None,
            player: Player::default(),
            phase: SessionPhase::NotStarted,
            elapsed_time: 0.0,
            completion: None,
            in_danger: false,
            active_dialog: None,
            pending_dialogs: VecDeque::new(),
            dialogs: DialogBook::new(),
            records: LevelRecords::new(),
            tuning,
            events: Vec::new(),
        }
    }

    pub fn with_dialogs(mut self, dialogs: DialogBook) -> Self {
        self.dialogs = dialogs;
        self
    }

    pub fn level(&self) -> Option<&Level> {
        self.current_level.and_then(|i| self.levels.get(i))
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.current_level.and_then(|i| self.levels.get_mut(i))
    }

    /// Enter a level. Returns false if `index` is out of range.
    ///
    /// The level's unlock dialog is shown the first time it is entered.
    pub fn set_level(&mut self, index: usize) -> bool {
        if index >= self.levels.len() {
            log::warn!("No level at index {} ({} loaded)", index, self.levels.len());
            return false;
        }
        self.current_level = Some(index);
        self.reset_level();
        log::info!("Entered level {} '{}'", index, self.levels[index].name);

        let level = &mut self.levels[index];
        if let Some(dialog) = level.on_unlock_dialog {
            if !level.did_initial_dialog {
                level.did_initial_dialog = true;
                self.show_dialog(dialog);
            }
        }
        true
    }

    /// Reset the current level to its entry state
    pub fn restart(&mut self) {
        if self.current_level.is_some() {
            self.reset_level();
            self.events.push(GameEvent::LevelRestarted);
        }
    }

    pub(crate) fn reset_level(&mut self) {
        let Some(level) = self.current_level.and_then(|i| self.levels.get_mut(i)) else {
            return;
        };
        level.reset_runtime();
        self.player = Player::spawn(level, &self.tuning);
        self.phase = SessionPhase::Active;
        self.elapsed_time = 0.0;
        self.completion = None;
        self.in_danger = false;
        self.active_dialog = None;
        self.pending_dialogs.clear();
    }

    /// A level is playable once enough files have been found across all levels
    pub fn is_unlocked(&self, index: usize) -> bool {
        self.levels
            .get(index)
            .is_some_and(|level| self.records.total_collected_files() >= u32::from(level.files_required))
    }

    /// Open dialog sequence `index` of the current level
    ///
    /// While another dialog is open the sequence waits its turn. Returns false
    /// (and does not block) if the sequence is missing or empty.
    pub fn show_dialog(&mut self, index: i32) -> bool {
        if !self.dialog_lines(index).is_some_and(|lines| !lines.is_empty()) {
            if let Some(level) = self.level() {
                log::warn!("Level '{}' has no dialog sequence {}", level.name, index);
            }
            return false;
        }
        if self.active_dialog.is_some() {
            log::debug!("Queued dialog sequence {}", index);
            self.pending_dialogs.push_back(index);
        } else {
            self.active_dialog = Some(ActiveDialog { index, line: 0 });
            self.events.push(GameEvent::DialogRequested { index });
        }
        true
    }

    /// Step to the next line, moving on to any queued sequence after the last.
    /// Returns true while a dialog stays open.
    pub fn advance_dialog(&mut self) -> bool {
        let Some(dialog) = self.active_dialog else {
            return false;
        };
        let next = dialog.line + 1;
        if self.dialog_lines(dialog.index).is_some_and(|lines| next < lines.len()) {
            self.active_dialog = Some(ActiveDialog { line: next, ..dialog });
            return true;
        }

        self.active_dialog = None;
        match self.pending_dialogs.pop_front() {
            Some(queued) => self.show_dialog(queued),
            None => false,
        }
    }

    /// Line to draw while a dialog blocks the session
    pub fn current_dialog_line(&self) -> Option<&DialogLine> {
        let dialog = self.active_dialog?;
        self.dialog_lines(dialog.index)?.get(dialog.line)
    }

    pub fn dialog_blocking(&self) -> bool {
        self.active_dialog.is_some()
    }

    /// The script's sequences win; levels the script does not cover use their own
    fn dialog_lines(&self, index: i32) -> Option<&[DialogLine]> {
        let level = self.level()?;
        if self.dialogs.sequence_count(&level.name) > 0 {
            return self.dialogs.sequence(&level.name, index);
        }
        let index = usize::try_from(index).ok()?;
        level.dialogs.get(index).map(Vec::as_slice)
    }

    /// Latch the completion and fold it into the records
    pub(crate) fn complete_level(&mut self, completion: Completion) {
        let Some(level) = self.level() else {
            return;
        };
        let name = level.name.clone();
        let author_time = level.author_time;
        let was_unlocked: Vec<bool> = (0..self.levels.len()).map(|i| self.is_unlocked(i)).collect();

        self.completion = Some(completion);
        self.phase = SessionPhase::Completed;
        let best = self
            .records
            .submit(&name, completion.time, completion.files_collected, author_time);
        log::info!(
            "Level '{}' completed in {} ({}/{} files){}",
            name,
            format_time(completion.time),
            completion.files_collected,
            completion.files_total,
            if best { ", new best" } else { "" }
        );
        self.events.push(GameEvent::LevelCompleted {
            time: completion.time,
            files_collected: completion.files_collected,
            files_total: completion.files_total,
        });

        for (index, was) in was_unlocked.into_iter().enumerate() {
            if !was && self.is_unlocked(index) {
                log::info!("Unlocked level {} '{}'", index, self.levels[index].name);
                self.events.push(GameEvent::LevelUnlocked { level: index });
            }
        }
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
