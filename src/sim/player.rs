//! Player ship physics
//!
//! One `update` advances the ship by `dt`: input thrust, one-way zone pushes,
//! speed cap, integration, friction, wall/door resolution, then the trail of
//! collected pickups.

use glam::Vec2;

use super::geometry::{SegmentContact, circle_intersects_polygon, circle_segment_contact, reflect_velocity};
use super::level::{Level, Pickup, WallKind, ZoneKind};
use super::state::GameEvent;
use super::tick::TickInput;
use crate::consts::*;
use crate::normalize_angle;
use crate::tuning::Tuning;

/// A collected pickup following the ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailLink {
    /// Index into the level's pickups
    pub pickup: usize,
    pub position: Vec2,
    /// Link velocity (units/s)
    pub direction: Vec2,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    /// Heading in radians, normalized to [-π, π)
    pub angle: f32,
    /// 0..=max_health
    pub health: f32,
    /// Collected pickups, nearest to the ship first
    pub trail: Vec<TrailLink>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            angle: PLAYER_START_ANGLE,
            health: PLAYER_MAX_HP,
            trail: Vec::new(),
        }
    }
}

impl Player {
    /// Fresh ship at the level's start pose
    pub fn spawn(level: &Level, tuning: &Tuning) -> Self {
        Self {
            position: level.start_position,
            velocity: Vec2::ZERO,
            angle: normalize_angle(level.start_angle),
            health: tuning.max_health,
            trail: Vec::new(),
        }
    }

    /// Unit vector along the heading
    #[inline]
    pub fn heading(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Advance the ship one frame against `level`
    ///
    /// Door timers on `level` advance here; opened doors and wall bounces are
    /// reported through `events`.
    pub fn update(
        &mut self,
        level: &mut Level,
        input: &TickInput,
        movement_locked: bool,
        tuning: &Tuning,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if !movement_locked {
            self.apply_input(input, tuning, dt);
        }
        self.apply_zone_forces(level, tuning, dt);
        self.clamp_speed(tuning.max_speed);

        self.position += self.velocity * dt;
        self.velocity *= tuning.friction.powf(dt);

        self.resolve_walls(level, tuning, dt, events);
        self.update_trail(tuning, dt);
    }

    fn apply_input(&mut self, input: &TickInput, tuning: &Tuning, dt: f32) {
        let thrust = self.heading() * tuning.player_speed * dt;
        if input.forward {
            self.velocity += thrust;
        }
        if input.back {
            self.velocity -= thrust;
        }
        if input.turn_left {
            self.angle -= tuning.turning_speed * dt;
        }
        if input.turn_right {
            self.angle += tuning.turning_speed * dt;
        }
        self.angle = normalize_angle(self.angle);
    }

    /// Every overlapped one-way zone pushes along its own angle; overlaps stack
    fn apply_zone_forces(&mut self, level: &Level, tuning: &Tuning, dt: f32) {
        for zone in &level.zones {
            if let ZoneKind::OneWay { angle, power } = zone.kind {
                if circle_intersects_polygon(self.position, tuning.player_radius, &zone.points, true) {
                    self.velocity += Vec2::new(angle.cos(), angle.sin()) * tuning.player_speed * power * dt;
                }
            }
        }
    }

    fn clamp_speed(&mut self, max_speed: f32) {
        if self.velocity.length() > max_speed {
            self.velocity = self.velocity.normalize_or_zero() * max_speed;
        }
    }

    /// Resolve contacts wall by wall, segment by segment
    ///
    /// Each contact moves the ship before the next segment is tested, so later
    /// walls see the corrected position.
    fn resolve_walls(&mut self, level: &mut Level, tuning: &Tuning, dt: f32, events: &mut Vec<GameEvent>) {
        let reach = tuning.wall_reach();
        let Level { walls, pickups, .. } = level;

        for (wall_index, wall) in walls.iter_mut().enumerate() {
            // Open doors only count up their fade timer
            if let Some(t) = wall.time_since_trigger.as_mut() {
                *t += dt;
                continue;
            }

            let mut opened = false;
            for (a, b) in wall.segments() {
                let Some(contact) = circle_segment_contact(self.position, reach, a, b) else {
                    continue;
                };

                // Carrying the key: consume it and pass through
                if let WallKind::Door { key_id } = wall.kind {
                    if let Some(slot) = self.trail_slot_for_key(pickups, key_id) {
                        self.trail.remove(slot);
                        log::debug!("Door {} opened with key {}", wall_index, key_id);
                        opened = true;
                        break;
                    }
                }

                // Solid wall or locked door
                self.bounce(contact, reach, tuning, events);
            }

            if opened {
                wall.time_since_trigger = Some(0.0);
                events.push(GameEvent::DoorOpened { wall: wall_index });
            }
        }
    }

    /// Trail position of a carried pickup whose id opens `key_id`
    fn trail_slot_for_key(&self, pickups: &[Pickup], key_id: u8) -> Option<usize> {
        self.trail.iter().position(|link| {
            pickups
                .get(link.pickup)
                .is_some_and(|pickup| pickup.id == i32::from(key_id))
        })
    }

    /// Respond to a solid contact
    ///
    /// Steep hits reflect and lose energy; shallow hits keep their speed and
    /// slide along the wall. Either way the ship ends up just outside reach.
    fn bounce(&mut self, contact: SegmentContact, reach: f32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        let normal = contact.normal;
        let speed = self.velocity.length();
        let approach = -self.velocity.dot(normal);

        if approach > 0.0 && speed > 0.0 {
            let incidence = (approach / speed).clamp(-1.0, 1.0).asin();
            if incidence > tuning.graze_angle {
                // Steep hit: reflect and lose energy
                self.velocity = reflect_velocity(self.velocity, normal) * tuning.bounce_slowdown;
                events.push(GameEvent::WallHit { speed });
            } else {
                // Graze: keep speed along the wall tangent
                let along = self.velocity - normal * self.velocity.dot(normal);
                self.velocity = along.normalize_or_zero() * speed;
            }
        }

        // Push back out to just beyond reach
        self.position = contact.point + normal * (reach + tuning.collision_epsilon);
    }

    /// Spring chain: each link is pulled toward the one ahead of it
    ///
    /// The spring acts as an acceleration, so `trail_stiffness` is in 1/s² and
    /// the link velocity gains `stretch * stiffness * dt` per frame.
    /// `trail_damping` is the velocity fraction a link keeps after one second.
    fn update_trail(&mut self, tuning: &Tuning, dt: f32) {
        let damping = tuning.trail_damping.powf(dt);
        let mut leader = self.position;

        for link in &mut self.trail {
            let offset = leader - link.position;
            let stretch = offset.length() - tuning.trail_rest_distance;
            link.direction += offset.normalize_or_zero() * stretch * tuning.trail_stiffness * dt;
            link.direction *= damping;
            link.position += link.direction * dt;
            leader = link.position;
        }
    }

    /// Where a newly collected pickup joins the trail: one rest length behind the last link
    pub fn next_trail_position(&self, tuning: &Tuning) -> Vec2 {
        let (anchor, motion) = match self.trail.last() {
            Some(link) => (link.position, link.direction),
            None => (self.position, self.velocity),
        };
        let back = (-motion).try_normalize().unwrap_or(-self.heading());
        anchor + back * tuning.trail_rest_distance
    }

    /// Append a collected pickup to the end of the trail
    pub fn attach_pickup(&mut self, pickup: usize, tuning: &Tuning) {
        let position = self.next_trail_position(tuning);
        self.trail.push(TrailLink {
            pickup,
            position,
            direction: Vec2::ZERO,
        });
    }
}
