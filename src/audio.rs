//! Audio cues and Web Audio playback
//!
//! The simulation only reports what happened; [`cue_for`] decides what that
//! sounds like. On wasm32 the [`AudioManager`] synthesizes every cue with
//! oscillators, so no sound files are needed.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Star popped
    Pop,
    /// Victory fanfare
    Celebration,
}

impl SoundEffect {
    /// Playback volume relative to the SFX channel
    pub fn volume(&self) -> f32 {
        match self {
            SoundEffect::Pop => 0.5,
            SoundEffect::Celebration => 0.6,
        }
    }
}

/// What the audio layer should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Play(SoundEffect),
    StartAmbient,
    StopAmbient,
    StopCelebration,
}

/// Map a simulation event to its audio cue, if it has one
pub fn cue_for(event: &GameEvent) -> Option<AudioCue> {
    match event {
        GameEvent::AmbientMusicStarted => Some(AudioCue::StartAmbient),
        GameEvent::AmbientMusicStopped => Some(AudioCue::StopAmbient),
        GameEvent::StarPopped { .. } => Some(AudioCue::Play(SoundEffect::Pop)),
        GameEvent::CelebrationStarted { .. } => Some(AudioCue::Play(SoundEffect::Celebration)),
        GameEvent::CelebrationMusicEnded | GameEvent::ReplayStarted => {
            Some(AudioCue::StopCelebration)
        }
        GameEvent::StarSpawned { .. }
        | GameEvent::ScoreChanged { .. }
        | GameEvent::Milestone { .. }
        | GameEvent::CelebrationBannerEnded
        | GameEvent::ReplayControlShown => None,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, SoundEffect};
    use crate::settings::Settings;

    /// Ambient pad chord (A minor-ish drone)
    const AMBIENT_FREQS: [f32; 3] = [110.0, 164.8, 220.0];
    /// Celebration arpeggio, repeated until stopped
    const FANFARE_FREQS: [f32; 6] = [523.3, 659.3, 784.0, 1046.5, 784.0, 1046.5];
    const FANFARE_REPEATS: usize = 4;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        ambient: Vec<(OscillatorNode, GainNode)>,
        celebration: Vec<(OscillatorNode, GainNode)>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                music_volume: 0.7,
                muted: false,
                ambient: Vec::new(),
                celebration: Vec::new(),
            }
        }

        /// Whether the browser still blocks playback until a user gesture
        pub fn is_locked(&self) -> bool {
            self.ctx
                .as_ref()
                .is_some_and(|ctx| ctx.state() == web_sys::AudioContextState::Suspended)
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if let Some(ctx) = &self.ctx {
                let _ = if muted { ctx.suspend() } else { ctx.resume() };
            }
        }

        fn sfx_gain(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn music_gain(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.music_volume
            }
        }

        pub fn handle(&mut self, cue: AudioCue) {
            match cue {
                AudioCue::Play(effect) => self.play(effect),
                AudioCue::StartAmbient => self.start_ambient(),
                AudioCue::StopAmbient => Self::stop_all(&mut self.ambient),
                AudioCue::StopCelebration => Self::stop_all(&mut self.celebration),
            }
        }

        /// Play a sound effect
        pub fn play(&mut self, effect: SoundEffect) {
            let vol = self.sfx_gain() * effect.volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.ctx.clone() else { return };

            match effect {
                SoundEffect::Pop => self.play_pop(&ctx, vol),
                SoundEffect::Celebration => self.play_celebration(&ctx, vol),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Pop - quick upward blip
        fn play_pop(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Celebration - repeating major arpeggio, cut short by StopCelebration
        fn play_celebration(&mut self, ctx: &AudioContext, vol: f32) {
            Self::stop_all(&mut self.celebration);
            let step = 0.15;
            let notes = FANFARE_FREQS.iter().cycle().take(FANFARE_FREQS.len() * FANFARE_REPEATS);
            for (i, freq) in notes.enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) else {
                    continue;
                };
                let t = ctx.current_time() + i as f64 * step;
                gain.gain().set_value_at_time(vol * 0.4, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
                self.celebration.push((osc, gain));
            }
        }

        /// Ambient - soft looping drone until stopped
        fn start_ambient(&mut self) {
            let vol = self.music_gain();
            let Some(ctx) = self.ctx.clone() else { return };
            if !self.ambient.is_empty() {
                return;
            }
            let t = ctx.current_time();
            for freq in AMBIENT_FREQS {
                let Some((osc, gain)) = self.create_osc(&ctx, freq, OscillatorType::Sine) else {
                    continue;
                };
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(vol * 0.08, t + 1.5)
                    .ok();
                osc.start().ok();
                self.ambient.push((osc, gain));
            }
        }

        fn stop_all(nodes: &mut Vec<(OscillatorNode, GainNode)>) {
            for (osc, gain) in nodes.drain(..) {
                osc.stop().ok();
                let _ = gain.disconnect();
            }
        }
    }
}
