//! On-screen text overlays
//!
//! Score label, "+10" popups, praise, celebration banner and the Play Again
//! control. Everything here is cosmetic: it is built from [`GameEvent`]s and
//! elapsed time and never feeds back into the simulation.

use glam::Vec2;

use crate::consts::{CELEBRATION_FADE_MS, REPLAY_BUTTON_CENTER, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::GameEvent;
use crate::sim::star::back_ease_out;

pub const SCORE_POS: Vec2 = Vec2::new(16.0, 16.0);
pub const START_PROMPT_POS: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, 250.0);
pub const PRAISE_POS: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 - 100.0);
pub const BANNER_POS: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 - 40.0);

pub const START_PROMPT_TEXT: &str = "Click to Start";
pub const BANNER_TEXT: &str = "🎉 Congratulations! 🎉";
pub const REPLAY_TEXT: &str = "▶️ Play Again";

/// Points popup: rise and fade
const POINTS_SECS: f32 = 0.8;
/// Praise: pop in, then rise and fade
const PRAISE_IN_SECS: f32 = 0.3;
const PRAISE_OUT_SECS: f32 = 1.0;
/// Distance popups drift upward
const POPUP_RISE: f32 = 50.0;
const BANNER_IN_SECS: f32 = 0.8;
const BANNER_OUT_SECS: f32 = CELEBRATION_FADE_MS as f32 / 1000.0;
const BUTTON_IN_SECS: f32 = 0.8;
const BUTTON_PULSE_SECS: f32 = 0.6;
/// Banner and button fade when Play Again is pressed
const REPLAY_FADE_SECS: f32 = 0.6;

fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    /// "+10" over a popped star
    Points,
    /// Milestone message
    Praise,
}

/// Short-lived floating text
#[derive(Debug, Clone)]
pub struct Popup {
    pub kind: PopupKind,
    pub text: String,
    pub origin: Vec2,
    pub age: f32,
}

impl Popup {
    pub fn duration(&self) -> f32 {
        match self.kind {
            PopupKind::Points => POINTS_SECS,
            PopupKind::Praise => PRAISE_IN_SECS + PRAISE_OUT_SECS,
        }
    }

    pub fn is_done(&self) -> bool {
        self.age >= self.duration()
    }

    /// Progress through the drift-and-fade part (0..1)
    fn fade_progress(&self) -> f32 {
        match self.kind {
            PopupKind::Points => ease_out_quad(self.age / POINTS_SECS),
            PopupKind::Praise => ease_out_quad((self.age - PRAISE_IN_SECS) / PRAISE_OUT_SECS),
        }
    }

    pub fn pos(&self, reduced_motion: bool) -> Vec2 {
        if reduced_motion {
            return self.origin;
        }
        self.origin - Vec2::new(0.0, POPUP_RISE * self.fade_progress())
    }

    pub fn alpha(&self) -> f32 {
        let start = match self.kind {
            PopupKind::Points => 1.0,
            PopupKind::Praise => 0.8,
        };
        start * (1.0 - self.fade_progress())
    }

    pub fn scale(&self) -> f32 {
        match self.kind {
            PopupKind::Points => 1.0,
            PopupKind::Praise => back_ease_out(self.age / PRAISE_IN_SECS),
        }
    }
}

/// A persistent element with a fade-in and an optional fade-out
#[derive(Debug, Clone, Default)]
pub struct FadingElement {
    pub age: f32,
    /// (elapsed, duration) once fading out
    pub fade_out: Option<(f32, f32)>,
}

impl FadingElement {
    fn start_fade(&mut self, secs: f32) {
        if self.fade_out.is_none() {
            self.fade_out = Some((0.0, secs));
        }
    }

    fn update(&mut self, dt: f32) {
        self.age += dt;
        if let Some((elapsed, _)) = self.fade_out.as_mut() {
            *elapsed += dt;
        }
    }

    fn is_done(&self) -> bool {
        matches!(self.fade_out, Some((elapsed, secs)) if elapsed >= secs)
    }

    fn alpha(&self, fade_in_secs: f32) -> f32 {
        let shown = (self.age / fade_in_secs).clamp(0.0, 1.0);
        match self.fade_out {
            Some((elapsed, secs)) => shown * (1.0 - (elapsed / secs).clamp(0.0, 1.0)),
            None => shown,
        }
    }
}

/// All overlay state for one screen
#[derive(Debug, Clone)]
pub struct Hud {
    pub score_text: String,
    /// "Click to Start" while audio is locked
    pub start_prompt: bool,
    pub popups: Vec<Popup>,
    pub banner: Option<FadingElement>,
    pub replay_button: Option<FadingElement>,
    /// Skip drift and pulsing
    pub reduced_motion: bool,
}

impl Hud {
    pub fn new(audio_unlocked: bool) -> Self {
        Self {
            score_text: score_label(0),
            start_prompt: !audio_unlocked,
            popups: Vec::new(),
            banner: None,
            replay_button: None,
            reduced_motion: false,
        }
    }

    /// Update overlays from one simulation event
    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::AmbientMusicStarted => self.start_prompt = false,
            GameEvent::StarPopped { pos, .. } => self.popups.push(Popup {
                kind: PopupKind::Points,
                text: format!("+{}", crate::consts::POP_SCORE),
                origin: *pos - Vec2::new(0.0, POPUP_RISE),
                age: 0.0,
            }),
            GameEvent::ScoreChanged { score } => self.score_text = score_label(*score),
            GameEvent::Milestone { message, .. } => self.popups.push(Popup {
                kind: PopupKind::Praise,
                text: (*message).to_string(),
                origin: PRAISE_POS,
                age: 0.0,
            }),
            GameEvent::CelebrationStarted { .. } => {
                self.banner = Some(FadingElement::default());
                self.replay_button = None;
            }
            GameEvent::CelebrationBannerEnded => {
                if let Some(banner) = self.banner.as_mut() {
                    banner.start_fade(BANNER_OUT_SECS);
                }
            }
            GameEvent::ReplayControlShown => {
                self.replay_button = Some(FadingElement::default());
            }
            GameEvent::ReplayStarted => {
                if let Some(banner) = self.banner.as_mut() {
                    banner.start_fade(REPLAY_FADE_SECS);
                }
                if let Some(button) = self.replay_button.as_mut() {
                    button.start_fade(REPLAY_FADE_SECS);
                }
            }
            GameEvent::AmbientMusicStopped
            | GameEvent::CelebrationMusicEnded
            | GameEvent::StarSpawned { .. } => {}
        }
    }

    /// Advance animations and drop finished elements
    pub fn update(&mut self, dt: f32) {
        for popup in &mut self.popups {
            popup.age += dt;
        }
        self.popups.retain(|p| !p.is_done());

        if let Some(banner) = self.banner.as_mut() {
            banner.update(dt);
            if banner.is_done() {
                self.banner = None;
            }
        }
        if let Some(button) = self.replay_button.as_mut() {
            button.update(dt);
            if button.is_done() {
                self.replay_button = None;
            }
        }
    }

    pub fn banner_alpha(&self) -> f32 {
        self.banner.as_ref().map_or(0.0, |b| b.alpha(BANNER_IN_SECS))
    }

    pub fn banner_scale(&self) -> f32 {
        self.banner
            .as_ref()
            .map_or(0.0, |b| back_ease_out(b.age / BANNER_IN_SECS))
    }

    pub fn replay_alpha(&self) -> f32 {
        self.replay_button
            .as_ref()
            .map_or(0.0, |b| b.alpha(BUTTON_IN_SECS))
    }

    /// Pulses between 1.0 and 1.1 once fully shown
    pub fn replay_scale(&self) -> f32 {
        let Some(button) = self.replay_button.as_ref() else {
            return 1.0;
        };
        if self.reduced_motion || button.age < BUTTON_IN_SECS {
            return 1.0;
        }
        let t = (button.age - BUTTON_IN_SECS) / BUTTON_PULSE_SECS;
        let cycle = t % 2.0;
        let phase = if cycle < 1.0 { cycle } else { 2.0 - cycle };
        1.0 + 0.1 * (0.5 - 0.5 * (phase * std::f32::consts::PI).cos())
    }

    pub fn replay_pos(&self) -> Vec2 {
        Vec2::new(REPLAY_BUTTON_CENTER.0, REPLAY_BUTTON_CENTER.1)
    }

    /// Active praise messages (oldest first)
    pub fn praise_texts(&self) -> impl Iterator<Item = &str> {
        self.popups
            .iter()
            .filter(|p| p.kind == PopupKind::Praise)
            .map(|p| p.text.as_str())
    }
}

pub fn score_label(score: u32) -> String {
    format!("Score: {}", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(hud: &mut Hud, secs: f32) {
        let steps = (secs / crate::consts::SIM_DT).round() as u32;
        for _ in 0..steps {
            hud.update(crate::consts::SIM_DT);
        }
    }

    #[test]
    fn test_start_prompt_until_music() {
        let mut hud = Hud::new(false);
        assert!(hud.start_prompt);
        hud.apply(&GameEvent::AmbientMusicStarted);
        assert!(!hud.start_prompt);
        assert!(!Hud::new(true).start_prompt);
    }

    #[test]
    fn test_score_label() {
        let mut hud = Hud::new(true);
        assert_eq!(hud.score_text, "Score: 0");
        hud.apply(&GameEvent::ScoreChanged { score: 120 });
        assert_eq!(hud.score_text, "Score: 120");
    }

    #[test]
    fn test_points_popup_rises_and_expires() {
        let mut hud = Hud::new(true);
        hud.apply(&GameEvent::StarPopped {
            id: 1,
            pos: Vec2::new(300.0, 300.0),
        });
        assert_eq!(hud.popups.len(), 1);
        assert_eq!(hud.popups[0].text, "+10");
        let start = hud.popups[0].pos(false);
        assert_eq!(start, Vec2::new(300.0, 250.0));

        run(&mut hud, 0.4);
        let popup = &hud.popups[0];
        assert!(popup.pos(false).y < start.y);
        assert!(popup.alpha() < 1.0);
        assert_eq!(popup.pos(true), start);

        run(&mut hud, 0.5);
        assert!(hud.popups.is_empty());
    }

    #[test]
    fn test_praise_lifetime() {
        let mut hud = Hud::new(true);
        hud.apply(&GameEvent::Milestone {
            score: 100,
            message: "Awesome!",
        });
        assert_eq!(hud.praise_texts().collect::<Vec<_>>(), ["Awesome!"]);
        assert!(hud.popups[0].scale() < 0.01);

        run(&mut hud, 0.3);
        assert!((hud.popups[0].scale() - 1.0).abs() < 0.01);
        run(&mut hud, 1.1);
        assert_eq!(hud.praise_texts().count(), 0);
    }

    #[test]
    fn test_celebration_banner_fades_after_end() {
        let mut hud = Hud::new(true);
        hud.apply(&GameEvent::CelebrationStarted { score: 200 });
        run(&mut hud, 1.0);
        assert!((hud.banner_alpha() - 1.0).abs() < 0.001);

        hud.apply(&GameEvent::CelebrationBannerEnded);
        run(&mut hud, 0.5);
        assert!(hud.banner_alpha() < 0.6 && hud.banner_alpha() > 0.4);
        run(&mut hud, 0.6);
        assert!(hud.banner.is_none());
    }

    #[test]
    fn test_replay_button_fades_in_and_pulses() {
        let mut hud = Hud::new(true);
        hud.apply(&GameEvent::CelebrationStarted { score: 200 });
        assert_eq!(hud.replay_alpha(), 0.0);
        hud.apply(&GameEvent::ReplayControlShown);
        run(&mut hud, 0.4);
        assert!(hud.replay_alpha() > 0.4 && hud.replay_alpha() < 0.6);
        assert_eq!(hud.replay_scale(), 1.0);

        run(&mut hud, 1.0);
        assert!((hud.replay_alpha() - 1.0).abs() < 0.001);
        let s = hud.replay_scale();
        assert!((1.0..=1.1).contains(&s));
    }

    #[test]
    fn test_replay_fades_everything() {
        let mut hud = Hud::new(true);
        hud.apply(&GameEvent::CelebrationStarted { score: 200 });
        hud.apply(&GameEvent::ReplayControlShown);
        run(&mut hud, 1.0);

        hud.apply(&GameEvent::ReplayStarted);
        hud.apply(&GameEvent::ScoreChanged { score: 0 });
        run(&mut hud, 0.7);
        assert!(hud.banner.is_none());
        assert!(hud.replay_button.is_none());
        assert_eq!(hud.score_text, "Score: 0");
    }
}
