//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use glam::Vec2;

use super::state::{GameState, SessionPhase};
use crate::consts::*;
use crate::in_replay_button;

/// Seconds the idle player waits before tapping a fresh star
pub const IDLE_REACTION_SECS: f32 = 0.25;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click position in screen space
    pub tap: Option<Vec2>,
    /// Idle/demo mode - the sim plays itself
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Background scrolls regardless of phase
    state.background.advance(dt);
    state.time_ticks += 1;

    // Timers first so a delay scheduled this tick counts from the next one
    for action in state.schedule.advance() {
        state.run_scheduled(action);
    }

    let tap = if input.idle_mode {
        idle_tap(state).or(input.tap)
    } else {
        input.tap
    };

    if let Some(point) = tap {
        handle_tap(state, point);
    }

    state.stars.animate(dt);
}

/// Route a tap to whatever it landed on
fn handle_tap(state: &mut GameState, point: Vec2) {
    // The first interaction only unlocks audio
    if !state.audio_unlocked() {
        state.unlock_audio();
        return;
    }

    match state.phase() {
        SessionPhase::Active => {
            if let Some(id) = state.stars.hit_test(point) {
                state.tap_star(id);
            }
        }
        SessionPhase::Celebrating => {
            if in_replay_button(point) {
                state.tap_replay();
            }
        }
    }
}

/// Where the idle player taps this tick, if anywhere
fn idle_tap(state: &GameState) -> Option<Vec2> {
    if !state.audio_unlocked() {
        return Some(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0));
    }
    match state.phase() {
        SessionPhase::Active => state
            .stars
            .current()
            .filter(|s| s.age >= IDLE_REACTION_SECS)
            .map(|s| s.pos),
        SessionPhase::Celebrating if state.replay_visible => {
            let (x, y) = REPLAY_BUTTON_CENTER;
            Some(Vec2::new(x, y))
        }
        SessionPhase::Celebrating => None,
    }
}
