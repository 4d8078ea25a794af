//! Frame-driven wrapper around the fixed-timestep simulation
//!
//! Hosts call [`GameRunner::update`] once per rendered frame with the real
//! elapsed time; the runner converts that into whole simulation ticks and
//! keeps the HUD in sync with the events they produce.

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::hud::Hud;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Longest frame the runner will try to catch up on (seconds)
const MAX_FRAME_DT: f32 = 0.1;

pub struct GameRunner {
    pub state: GameState,
    pub hud: Hud,
    pub input: TickInput,
    accumulator: f32,
}

impl GameRunner {
    pub fn new(seed: u64, audio_unlocked: bool, settings: &Settings) -> Self {
        let mut state = GameState::new(seed, audio_unlocked);
        state.background.speed = settings.scroll_speed;
        let mut hud = Hud::new(audio_unlocked);
        hud.reduced_motion = settings.reduced_motion;

        let mut runner = Self {
            state,
            hud,
            input: TickInput::default(),
            accumulator: 0.0,
        };
        // Events emitted while constructing (first spawn when already unlocked)
        for event in runner.state.drain_events() {
            runner.hud.apply(&event);
        }
        runner
    }

    /// Queue a tap for the next tick
    pub fn tap(&mut self, point: Vec2) {
        self.input.tap = Some(point);
    }

    pub fn set_idle(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Run simulation ticks for `dt` seconds of real time.
    ///
    /// Returns every event produced, in order, after applying them to the HUD.
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.tap = None;

            events.extend(self.state.drain_events());
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in &events {
            self.hud.apply(event);
        }
        self.hud.update(substeps as f32 * SIM_DT);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SessionPhase;

    #[test]
    fn test_new_applies_startup_events() {
        let runner = GameRunner::new(1, true, &Settings::default());
        assert!(!runner.hud.start_prompt);
        assert_eq!(runner.state.stars.alive_count(), 1);
    }

    #[test]
    fn test_settings_flow_into_state() {
        let settings = Settings {
            scroll_speed: 90.0,
            reduced_motion: true,
            ..Default::default()
        };
        let runner = GameRunner::new(1, false, &settings);
        assert_eq!(runner.state.background.speed, 90.0);
        assert!(runner.hud.reduced_motion);
        assert!(runner.hud.start_prompt);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut runner = GameRunner::new(1, true, &Settings::default());
        runner.update(5.0);
        assert_eq!(runner.state.time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut runner = GameRunner::new(1, true, &Settings::default());
        runner.update(SIM_DT * 0.6);
        assert_eq!(runner.state.time_ticks, 0);
        runner.update(SIM_DT * 0.6);
        assert_eq!(runner.state.time_ticks, 1);
    }

    #[test]
    fn test_tap_is_one_shot() {
        let mut runner = GameRunner::new(1, false, &Settings::default());
        runner.tap(Vec2::new(10.0, 10.0));
        let events = runner.update(SIM_DT * 4.0);
        assert!(events.contains(&GameEvent::AmbientMusicStarted));
        assert!(runner.input.tap.is_none());
        assert!(!runner.hud.start_prompt);
    }

    #[test]
    fn test_pop_updates_hud() {
        let mut runner = GameRunner::new(5, true, &Settings::default());
        let pos = runner.state.stars.current().unwrap().pos;
        runner.tap(pos);
        runner.update(SIM_DT * 1.5);
        assert_eq!(runner.hud.score_text, "Score: 10");
        assert_eq!(runner.hud.popups.len(), 1);
    }

    #[test]
    fn test_idle_runner_reaches_celebration() {
        let mut runner = GameRunner::new(6, false, &Settings::default());
        runner.set_idle(true);
        let mut celebrated = false;
        for _ in 0..3000 {
            runner.update(1.0 / 60.0);
            if runner.state.phase() == SessionPhase::Celebrating {
                celebrated = true;
                assert!(runner.hud.banner.is_some());
                break;
            }
        }
        assert!(celebrated);
    }
}
