//! Star entity and its spawn/pop lifecycle
//!
//! The manager holds at most one star. It does not refuse a second spawn on
//! its own; the session only asks for a star when none is alive.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Bubble-in duration (seconds)
pub const BUBBLE_IN_SECS: f32 = 0.5;
/// Seconds per full spin
pub const SPIN_PERIOD_SECS: f32 = 2.0;
/// Seconds per pulse half-cycle (grow or shrink)
pub const PULSE_HALF_SECS: f32 = 0.8;

/// A tappable star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub pos: Vec2,
    pub alive: bool,
    /// Seconds since spawn. Drives the bubble/spin/pulse and the idle
    /// player's reaction delay, so it is saved with the session.
    pub age: f32,
}

impl Star {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            alive: true,
            age: 0.0,
        }
    }

    /// Check if a tap at `point` lands on this star
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= STAR_HIT_RADIUS * STAR_HIT_RADIUS
    }

    /// Rotation angle in radians
    pub fn spin_angle(&self) -> f32 {
        (self.age / SPIN_PERIOD_SECS).fract() * std::f32::consts::TAU
    }

    /// Display scale: bubble in from 0.3 to 0.8, then pulse between 0.75 and 0.85
    pub fn display_scale(&self) -> f32 {
        if self.age < BUBBLE_IN_SECS {
            let t = self.age / BUBBLE_IN_SECS;
            return 0.3 + 0.5 * back_ease_out(t);
        }
        let t = (self.age - BUBBLE_IN_SECS) / PULSE_HALF_SECS;
        let cycle = t % 2.0;
        // Yoyo: 0..1 grows, 1..2 shrinks
        let phase = if cycle < 1.0 { cycle } else { 2.0 - cycle };
        let eased = 0.5 - 0.5 * (phase * std::f32::consts::PI).cos();
        0.75 + 0.1 * eased
    }
}

/// Overshooting ease-out used for pop-in effects
pub fn back_ease_out(t: f32) -> f32 {
    const C1: f32 = 1.70158;
    const C3: f32 = C1 + 1.0;
    let t = t.clamp(0.0, 1.0) - 1.0;
    1.0 + C3 * t * t * t + C1 * t * t
}

/// Owner of the single live star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarManager {
    star: Option<Star>,
    next_id: u32,
    /// Stars spawned over the manager's lifetime
    pub spawned_total: u32,
}

impl Default for StarManager {
    fn default() -> Self {
        Self {
            star: None,
            next_id: 1,
            spawned_total: 0,
        }
    }
}

impl StarManager {
    /// The live star, if any
    pub fn current(&self) -> Option<&Star> {
        self.star.as_ref().filter(|s| s.alive)
    }

    /// Number of live stars (0 or 1)
    pub fn alive_count(&self) -> usize {
        usize::from(self.current().is_some())
    }

    /// Spawn a star at a uniformly random position inside the play field
    pub fn spawn<R: Rng>(&mut self, rng: &mut R) -> &Star {
        let x = rng.random_range(STAR_FIELD_MIN_X..=STAR_FIELD_MAX_X);
        let y = rng.random_range(STAR_FIELD_MIN_Y..=STAR_FIELD_MAX_Y);
        self.spawn_at(Vec2::new(x, y))
    }

    /// Spawn a star at a fixed position
    pub fn spawn_at(&mut self, pos: Vec2) -> &Star {
        let id = self.next_id;
        self.next_id += 1;
        self.spawned_total += 1;
        self.star.insert(Star::new(id, pos))
    }

    /// Remove the star with `id` if it is still alive. Returns the popped star.
    pub fn pop(&mut self, id: u32) -> Option<Star> {
        match &self.star {
            Some(star) if star.alive && star.id == id => {
                let mut star = self.star.take()?;
                star.alive = false;
                Some(star)
            }
            _ => None,
        }
    }

    /// ID of the live star under `point`
    pub fn hit_test(&self, point: Vec2) -> Option<u32> {
        self.current().filter(|s| s.contains(point)).map(|s| s.id)
    }

    /// Advance decorative motion
    pub fn animate(&mut self, dt: f32) {
        if let Some(star) = self.star.as_mut() {
            star.age += dt;
        }
    }

    /// Drop any star without scoring it
    pub fn clear(&mut self) {
        self.star = None;
    }
}
