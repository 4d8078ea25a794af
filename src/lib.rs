//! Star Pop - A single-screen star popping arcade game
//!
//! Core modules:
//! - `sim`: Deterministic session simulation (stars, score, milestones, celebration)
//! - `hud`: Overlay text model driven by simulation events
//! - `audio`: Sound cue mapping (Web Audio playback on wasm32)
//! - `settings`: Player preferences
//! - `runner`: Frame-to-tick driver shared by the hosts

pub mod audio;
pub mod hud;
pub mod runner;
pub mod settings;
pub mod sim;

pub use hud::Hud;
pub use runner::GameRunner;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical screen dimensions
    pub const SCREEN_WIDTH: f32 = 1000.0;
    pub const SCREEN_HEIGHT: f32 = 550.0;

    /// Play field stars may spawn in (kept above the ground line)
    pub const STAR_FIELD_MIN_X: f32 = 100.0;
    pub const STAR_FIELD_MAX_X: f32 = 900.0;
    pub const STAR_FIELD_MIN_Y: f32 = 150.0;
    pub const STAR_FIELD_MAX_Y: f32 = 400.0;
    /// Tap radius around a star's center
    pub const STAR_HIT_RADIUS: f32 = 48.0;

    /// Points per popped star
    pub const POP_SCORE: u32 = 10;
    /// Score that ends active play
    pub const VICTORY_SCORE: u32 = 200;

    /// Delay between a pop and the next star
    pub const RESPAWN_DELAY_MS: u32 = 300;
    /// Delay between the replay tap and the first star of the new session
    pub const REPLAY_SPAWN_DELAY_MS: u32 = 300;
    /// Delay before the Play Again control fades in
    pub const REPLAY_CONTROL_DELAY_MS: u32 = 2500;
    /// Delay before the celebration banner fades out
    pub const CELEBRATION_FADE_DELAY_MS: u32 = 3000;
    /// Length of the banner fade; celebration music stops when it completes
    pub const CELEBRATION_FADE_MS: u32 = 1000;

    /// Background scroll speed (pixels/s, 0.5 px per 60 Hz frame)
    pub const BG_SCROLL_SPEED: f32 = 30.0;

    /// Play Again control bounds (center and half extents)
    pub const REPLAY_BUTTON_CENTER: (f32, f32) = (500.0, 315.0);
    pub const REPLAY_BUTTON_HALF_SIZE: (f32, f32) = (140.0, 32.0);
}

/// Convert a millisecond delay to whole simulation ticks
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms as f32 / 1000.0 / consts::SIM_DT).round() as u32
}

/// Check whether a point lies inside the Play Again control
#[inline]
pub fn in_replay_button(point: Vec2) -> bool {
    let (cx, cy) = consts::REPLAY_BUTTON_CENTER;
    let (hw, hh) = consts::REPLAY_BUTTON_HALF_SIZE;
    (point.x - cx).abs() <= hw && (point.y - cy).abs() <= hh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(0), 0);
        assert_eq!(ms_to_ticks(300), 36);
        assert_eq!(ms_to_ticks(2500), 300);
        assert_eq!(ms_to_ticks(3000), 360);
    }

    #[test]
    fn test_replay_button_bounds() {
        let (cx, cy) = consts::REPLAY_BUTTON_CENTER;
        assert!(in_replay_button(Vec2::new(cx, cy)));
        assert!(in_replay_button(Vec2::new(cx + 139.0, cy - 31.0)));
        assert!(!in_replay_button(Vec2::new(cx + 141.0, cy)));
        assert!(!in_replay_button(Vec2::new(cx, cy + 40.0)));
    }
}
