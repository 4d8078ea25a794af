//! Session state and its transitions
//!
//! Everything needed to resume or replay a session lives here. Cosmetic
//! presentation is left to whoever drains [`GameEvent`]s.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::background::BackgroundScroller;
use super::schedule::{Schedule, ScheduledAction};
use super::score::{ScoreTracker, milestones_crossed};
use super::star::StarManager;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Stars spawn and can be popped
    #[default]
    Active,
    /// Victory reached, waiting for Play Again
    Celebrating,
}

/// Logical changes reported to the presentation layer, in the order they happened
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Looping background music should (re)start
    AmbientMusicStarted,
    /// Looping background music should stop
    AmbientMusicStopped,
    StarSpawned { id: u32, pos: Vec2 },
    /// A star was tapped and removed (pop feedback plays here)
    StarPopped { id: u32, pos: Vec2 },
    ScoreChanged { score: u32 },
    /// A praise threshold was crossed
    Milestone { score: u32, message: &'static str },
    CelebrationStarted { score: u32 },
    /// Celebration banner starts fading out
    CelebrationBannerEnded,
    /// Banner fade finished; celebration music stops
    CelebrationMusicEnded,
    ReplayControlShown,
    /// Play Again was pressed; a new session begins
    ReplayStarted,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next draw; advances the stream so draws never repeat
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Current phase
    phase: SessionPhase,
    /// Whether the platform allows audio playback yet
    audio_unlocked: bool,
    /// Score
    pub score: ScoreTracker,
    /// Star lifecycle
    pub stars: StarManager,
    /// Scrolling background
    pub background: BackgroundScroller,
    /// Pending delayed actions
    pub schedule: Schedule,
    /// Play Again control visible and tappable
    pub replay_visible: bool,
    /// Celebration banner still on screen
    pub celebration_banner: bool,
    /// Completed sessions (victories) since start
    pub rounds_completed: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events not yet consumed by the presentation layer
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed.
    ///
    /// When audio is still locked the first star waits for [`GameState::unlock_audio`].
    pub fn new(seed: u64, audio_unlocked: bool) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            phase: SessionPhase::Active,
            audio_unlocked: false,
            score: ScoreTracker::default(),
            stars: StarManager::default(),
            background: BackgroundScroller::default(),
            schedule: Schedule::default(),
            replay_visible: false,
            celebration_banner: false,
            rounds_completed: 0,
            time_ticks: 0,
            events: Vec::new(),
        };

        if audio_unlocked {
            state.unlock_audio();
        } else {
            log::info!("Audio locked, waiting for first interaction");
        }

        state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn audio_unlocked(&self) -> bool {
        self.audio_unlocked
    }

    /// Current score value
    pub fn score_value(&self) -> u32 {
        self.score.value()
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Handle the one-time interaction that permits audio. Returns false if already unlocked.
    pub fn unlock_audio(&mut self) -> bool {
        if self.audio_unlocked {
            return false;
        }
        self.audio_unlocked = true;
        self.events.push(GameEvent::AmbientMusicStarted);
        log::info!("Audio unlocked, starting session");

        if self.phase == SessionPhase::Active
            && self.stars.current().is_none()
            && !self.schedule.is_pending(ScheduledAction::SpawnStar)
        {
            self.spawn_star();
        }
        true
    }

    /// Spawn a star if the session allows one. Returns the new star's ID.
    pub fn spawn_star(&mut self) -> Option<u32> {
        if self.phase != SessionPhase::Active {
            log::warn!("Spawn requested while {:?}, ignoring", self.phase);
            return None;
        }
        if !self.audio_unlocked {
            log::warn!("Spawn requested before audio unlock, ignoring");
            return None;
        }
        if let Some(star) = self.stars.current() {
            log::warn!("Spawn requested while star {} is alive, ignoring", star.id);
            return None;
        }

        let mut rng = self.rng_state.next_rng();
        let star = self.stars.spawn(&mut rng);
        let (id, pos) = (star.id, star.pos);
        log::debug!("Star {} spawned at ({:.0}, {:.0})", id, pos.x, pos.y);
        self.events.push(GameEvent::StarSpawned { id, pos });
        Some(id)
    }

    /// Pop the star with `id`. Stale or unknown IDs are ignored.
    ///
    /// Runs the whole pop sequence: removal, score, milestones, victory check
    /// and then either a delayed respawn or the celebration.
    pub fn tap_star(&mut self, id: u32) -> bool {
        if self.phase != SessionPhase::Active {
            return false;
        }
        let Some(star) = self.stars.pop(id) else {
            log::debug!("Tap on star {} ignored (not alive)", id);
            return false;
        };
        self.events.push(GameEvent::StarPopped { id, pos: star.pos });

        let previous = self.score.value();
        let score = self.score.apply_pop();
        self.events.push(GameEvent::ScoreChanged { score });
        log::debug!("Star {} popped, score {}", id, score);

        for milestone in milestones_crossed(previous, score) {
            log::info!("Milestone {}: {}", milestone.score, milestone.message);
            self.events.push(GameEvent::Milestone {
                score: milestone.score,
                message: milestone.message,
            });
        }

        if self.score.is_victory() {
            self.enter_celebration();
        } else {
            self.schedule
                .after_ms(RESPAWN_DELAY_MS, ScheduledAction::SpawnStar);
        }
        true
    }

    fn enter_celebration(&mut self) {
        self.phase = SessionPhase::Celebrating;
        self.rounds_completed += 1;
        let dropped = self.schedule.cancel(ScheduledAction::SpawnStar);
        if dropped > 0 {
            log::warn!("Dropped {} pending spawn(s) on victory", dropped);
        }
        self.stars.clear();

        self.events.push(GameEvent::AmbientMusicStopped);
        self.events.push(GameEvent::CelebrationStarted {
            score: self.score.value(),
        });
        self.celebration_banner = true;
        self.replay_visible = false;
        self.schedule.after_ms(
            REPLAY_CONTROL_DELAY_MS,
            ScheduledAction::ShowReplayControl,
        );
        self.schedule.after_ms(
            CELEBRATION_FADE_DELAY_MS,
            ScheduledAction::EndCelebrationBanner,
        );
        self.schedule.after_ms(
            CELEBRATION_FADE_DELAY_MS + CELEBRATION_FADE_MS,
            ScheduledAction::EndCelebrationMusic,
        );
        log::info!(
            "Victory at {} points (round {})",
            self.score.value(),
            self.rounds_completed
        );
    }

    /// Press Play Again. Ignored unless celebrating with the control visible.
    pub fn tap_replay(&mut self) -> bool {
        if self.phase != SessionPhase::Celebrating || !self.replay_visible {
            log::debug!("Replay tap ignored");
            return false;
        }

        self.phase = SessionPhase::Active;
        self.replay_visible = false;
        self.celebration_banner = false;
        self.schedule.clear();
        self.score.reset();

        self.events.push(GameEvent::ReplayStarted);
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.events.push(GameEvent::AmbientMusicStarted);
        self.schedule
            .after_ms(REPLAY_SPAWN_DELAY_MS, ScheduledAction::SpawnStar);
        log::info!("Replay started");
        true
    }

    /// Run an action whose delay has elapsed
    pub(crate) fn run_scheduled(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::SpawnStar => {
                self.spawn_star();
            }
            ScheduledAction::ShowReplayControl => {
                if self.phase == SessionPhase::Celebrating && !self.replay_visible {
                    self.replay_visible = true;
                    self.events.push(GameEvent::ReplayControlShown);
                }
            }
            ScheduledAction::EndCelebrationBanner => {
                if self.phase == SessionPhase::Celebrating && self.celebration_banner {
                    self.celebration_banner = false;
                    self.events.push(GameEvent::CelebrationBannerEnded);
                }
            }
            ScheduledAction::EndCelebrationMusic => {
                if self.phase == SessionPhase::Celebrating {
                    self.events.push(GameEvent::CelebrationMusicEnded);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pop_current(state: &mut GameState) -> bool {
        let id = state.stars.current().expect("a live star").id;
        state.tap_star(id)
    }

    /// Fire scheduled actions until `action` is no longer pending
    fn flush(state: &mut GameState, action: ScheduledAction) {
        while state.schedule.is_pending(action) {
            for due in state.schedule.advance() {
                state.run_scheduled(due);
            }
        }
    }

    #[test]
    fn test_new_unlocked_spawns_immediately() {
        let mut state = GameState::new(1, true);
        assert_eq!(state.phase(), SessionPhase::Active);
        assert_eq!(state.stars.alive_count(), 1);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::AmbientMusicStarted);
        assert!(matches!(events[1], GameEvent::StarSpawned { .. }));
    }

    #[test]
    fn test_locked_audio_defers_first_spawn() {
        let mut state = GameState::new(1, false);
        assert_eq!(state.stars.alive_count(), 0);
        assert!(state.drain_events().is_empty());
        assert_eq!(state.spawn_star(), None);

        assert!(state.unlock_audio());
        assert_eq!(state.stars.alive_count(), 1);
        // Second unlock is a no-op
        assert!(!state.unlock_audio());
        assert_eq!(state.stars.spawned_total, 1);
    }

    #[test]
    fn test_pop_sequence_order() {
        let mut state = GameState::new(3, true);
        state.drain_events();
        for _ in 0..4 {
            pop_current(&mut state);
            flush(&mut state, ScheduledAction::SpawnStar);
        }
        state.drain_events();

        let id = state.stars.current().unwrap().id;
        state.tap_star(id);
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::StarPopped { id: popped, .. } if popped == id));
        assert_eq!(events[1], GameEvent::ScoreChanged { score: 50 });
        assert_eq!(
            events[2],
            GameEvent::Milestone {
                score: 50,
                message: "Nice!"
            }
        );
        assert_eq!(events.len(), 3);
        assert!(state.schedule.is_pending(ScheduledAction::SpawnStar));
    }

    #[test]
    fn test_spawn_refused_while_star_alive() {
        let mut state = GameState::new(5, true);
        assert_eq!(state.spawn_star(), None);
        assert_eq!(state.stars.alive_count(), 1);
    }

    #[test]
    fn test_victory_suppresses_respawn() {
        let mut state = GameState::new(9, true);
        for _ in 0..19 {
            pop_current(&mut state);
            flush(&mut state, ScheduledAction::SpawnStar);
        }
        assert_eq!(state.score_value(), 190);

        pop_current(&mut state);
        assert_eq!(state.phase(), SessionPhase::Celebrating);
        assert!(!state.schedule.is_pending(ScheduledAction::SpawnStar));
        assert!(state.schedule.is_pending(ScheduledAction::ShowReplayControl));
        assert!(state.celebration_banner);
        assert_eq!(state.rounds_completed, 1);
    }

    #[test]
    fn test_replay_hidden_until_control_shown() {
        let mut state = GameState::new(9, true);
        for _ in 0..20 {
            pop_current(&mut state);
            flush(&mut state, ScheduledAction::SpawnStar);
        }
        assert!(!state.tap_replay());
        assert_eq!(state.phase(), SessionPhase::Celebrating);

        flush(&mut state, ScheduledAction::ShowReplayControl);
        assert!(state.replay_visible);
        assert!(state.tap_replay());
        assert_eq!(state.phase(), SessionPhase::Active);
        assert_eq!(state.score_value(), 0);
        assert_eq!(state.schedule.pending_count(ScheduledAction::SpawnStar), 1);
        assert!(!state.schedule.is_pending(ScheduledAction::EndCelebrationBanner));
        assert!(!state.schedule.is_pending(ScheduledAction::EndCelebrationMusic));
    }

    #[test]
    fn test_celebration_music_outlasts_banner_fade() {
        let mut state = GameState::new(9, true);
        for _ in 0..20 {
            pop_current(&mut state);
            flush(&mut state, ScheduledAction::SpawnStar);
        }
        let banner = state.schedule.ticks_until(ScheduledAction::EndCelebrationBanner);
        let music = state.schedule.ticks_until(ScheduledAction::EndCelebrationMusic);
        assert_eq!(banner, Some(crate::ms_to_ticks(CELEBRATION_FADE_DELAY_MS)));
        assert_eq!(
            music,
            Some(crate::ms_to_ticks(CELEBRATION_FADE_DELAY_MS + CELEBRATION_FADE_MS))
        );

        state.drain_events();
        flush(&mut state, ScheduledAction::EndCelebrationBanner);
        assert!(!state.drain_events().contains(&GameEvent::CelebrationMusicEnded));
        flush(&mut state, ScheduledAction::EndCelebrationMusic);
        assert!(state.drain_events().contains(&GameEvent::CelebrationMusicEnded));
    }

    #[test]
    fn test_replay_outside_celebration_is_noop() {
        let mut state = GameState::new(2, true);
        pop_current(&mut state);
        assert!(!state.tap_replay());
        assert_eq!(state.score_value(), 10);
    }

    #[test]
    fn test_rng_streams_differ() {
        use rand::Rng;
        let mut rng_state = RngState::new(42);
        let a: u32 = rng_state.next_rng().random();
        let b: u32 = rng_state.next_rng().random();
        assert_ne!(a, b);
        assert_eq!(rng_state.stream, 2);
    }
}
