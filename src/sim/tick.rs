//! Per-frame session tick
//!
//! Order each frame: clock, player step, pickup collection, zone triggers,
//! health. Nothing advances while a dialog is open.

use super::geometry::{circle_intersects_polygon, circles_overlap};
use super::level::{Level, ZoneKind};
use super::player::Player;
use super::state::{Completion, GameEvent, GameSession, SessionPhase};
use crate::tuning::Tuning;

/// Control state for one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    /// Restart the current level
    pub restart: bool,
}

/// What the zones reported this frame
#[derive(Debug, Default)]
struct ZoneReport {
    in_danger: bool,
    reached_end: bool,
    dialogs: Vec<i32>,
}

/// Advance the session by `dt` seconds
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    let Some(level_index) = session.current_level else {
        return;
    };
    // Modal dialog freezes everything
    if session.dialog_blocking() {
        return;
    }
    if input.restart {
        session.restart();
        return;
    }

    session.elapsed_time += f64::from(dt);
    let completed = session.phase == SessionPhase::Completed;

    let GameSession {
        levels,
        player,
        tuning,
        events,
        ..
    } = session;
    let Some(level) = levels.get_mut(level_index) else {
        return;
    };

    // Physics
    level.advance_timers(dt);
    player.update(level, input, completed, tuning, dt, events);
    collect_pickups(player, level, tuning, events);

    // Zone triggers
    let report = evaluate_zones(player, level, tuning, completed);
    let files_collected = level.collected_file_count();
    let files_total = level.file_count();

    // Latch completion on first arrival
    if report.reached_end && session.completion.is_none() && !completed {
        session.complete_level(Completion {
            time: session.elapsed_time,
            files_collected,
            files_total,
        });
    }
    // Several triggers in one frame queue behind each other
    for index in report.dialogs {
        session.show_dialog(index);
    }

    if session.phase == SessionPhase::Completed {
        // Health is frozen once the level is done
        session.in_danger = false;
        return;
    }
    session.in_danger = report.in_danger;
    update_health(session, dt);
}

fn collect_pickups(player: &mut Player, level: &mut Level, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    for (index, pickup) in level.pickups.iter_mut().enumerate() {
        if pickup.is_collected() {
            continue;
        }
        if circles_overlap(player.position, tuning.player_radius, pickup.position, tuning.pickup_radius) {
            pickup.time_since_pickup = Some(0.0);
            player.attach_pickup(index, tuning);
            log::debug!("Collected {:?} pickup {} (id {})", pickup.kind, index, pickup.id);
            events.push(GameEvent::PickupCollected { pickup: index });
        }
    }
}

/// Zone triggers; dialog zones fire once, on their first touch
fn evaluate_zones(player: &Player, level: &mut Level, tuning: &Tuning, completed: bool) -> ZoneReport {
    let mut report = ZoneReport::default();

    for zone in &mut level.zones {
        let skip = match zone.kind {
            ZoneKind::Danger => completed || report.in_danger,
            ZoneKind::End => report.reached_end,
            ZoneKind::DialogTrigger { .. } => zone.time_since_trigger.is_some(),
            ZoneKind::OneWay { .. } => true,
        };
        if skip || !circle_intersects_polygon(player.position, tuning.player_radius, &zone.points, true) {
            continue;
        }

        match zone.kind {
            ZoneKind::Danger => report.in_danger = true,
            ZoneKind::End => report.reached_end = true,
            ZoneKind::DialogTrigger { dialog_index } => {
                zone.time_since_trigger = Some(0.0);
                report.dialogs.push(dialog_index);
            }
            ZoneKind::OneWay { .. } => {}
        }
    }

    report
}

/// Regenerate outside danger, drain inside it; empty health resets the level
fn update_health(session: &mut GameSession, dt: f32) {
    let max = session.tuning.max_health;
    let delta = if session.in_danger { -dt } else { dt };
    let player = &mut session.player;
    player.health = (player.health + delta).clamp(0.0, max);

    if player.health <= 0.0 {
        log::info!("Player died after {:.2}s", session.elapsed_time);
        session.events.push(GameEvent::PlayerDied);
        session.reset_level();
    }
}
