//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Effects are described as short tone lists so the mapping from game events
//! to sounds can be checked without a browser. Every Web Audio failure is
//! swallowed.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round connects
    Hit,
    /// Round goes wide
    Miss,
    /// A unit dies
    Death,
    /// Unit walks
    Step,
    Reload,
    /// Stance change
    Shuffle,
    /// Overwatch interrupt
    Reaction,
    /// Control returns to the player
    TurnStart,
    /// Aliens begin moving
    AlienTurn,
    Victory,
    Defeat,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator voice with an exponential fade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub freq_start: f32,
    pub freq_end: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Seconds after trigger
    pub delay: f64,
    pub duration: f64,
}

const fn tone(
    wave: Wave,
    freq_start: f32,
    freq_end: f32,
    gain: f32,
    delay: f64,
    duration: f64,
) -> Tone {
    Tone {
        wave,
        freq_start,
        freq_end,
        gain,
        delay,
        duration,
    }
}

use Wave::{Sawtooth, Sine, Square, Triangle};

// Shot crack followed by a thud
const HIT: &[Tone] = &[
    tone(Sawtooth, 900.0, 120.0, 0.35, 0.0, 0.08),
    tone(Square, 160.0, 60.0, 0.3, 0.06, 0.12),
];
const MISS: &[Tone] = &[
    tone(Sawtooth, 900.0, 120.0, 0.35, 0.0, 0.08),
    tone(Sine, 1800.0, 900.0, 0.12, 0.05, 0.15),
];
const DEATH: &[Tone] = &[
    tone(Triangle, 300.0, 50.0, 0.45, 0.0, 0.5),
    tone(Sine, 70.0, 30.0, 0.4, 0.0, 0.4),
];
const STEP: &[Tone] = &[tone(Sine, 120.0, 90.0, 0.15, 0.0, 0.05)];
const RELOAD: &[Tone] = &[
    tone(Square, 600.0, 500.0, 0.15, 0.0, 0.04),
    tone(Square, 900.0, 800.0, 0.15, 0.12, 0.04),
];
const SHUFFLE: &[Tone] = &[tone(Triangle, 200.0, 150.0, 0.12, 0.0, 0.06)];
const REACTION: &[Tone] = &[tone(Square, 1200.0, 1200.0, 0.2, 0.0, 0.06)];
const TURN_START: &[Tone] = &[
    tone(Sine, 523.25, 523.25, 0.25, 0.0, 0.12),
    tone(Sine, 783.99, 783.99, 0.25, 0.1, 0.18),
];
const ALIEN_TURN: &[Tone] = &[
    tone(Triangle, 220.0, 196.0, 0.25, 0.0, 0.25),
    tone(Triangle, 185.0, 155.0, 0.25, 0.2, 0.3),
];
// C major arpeggio
const VICTORY: &[Tone] = &[
    tone(Sine, 523.25, 523.25, 0.3, 0.0, 0.15),
    tone(Sine, 659.25, 659.25, 0.3, 0.12, 0.15),
    tone(Sine, 783.99, 783.99, 0.3, 0.24, 0.15),
    tone(Sine, 1046.5, 1046.5, 0.3, 0.36, 0.4),
];
const DEFEAT: &[Tone] = &[
    tone(Sawtooth, 300.0, 200.0, 0.3, 0.0, 0.3),
    tone(Sawtooth, 250.0, 150.0, 0.3, 0.25, 0.3),
    tone(Sawtooth, 200.0, 80.0, 0.3, 0.5, 0.6),
];

impl SoundEffect {
    /// Sound for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired { hit: true, .. } => Some(SoundEffect::Hit),
            GameEvent::ShotFired { hit: false, .. } => Some(SoundEffect::Miss),
            GameEvent::UnitKilled { .. } => Some(SoundEffect::Death),
            GameEvent::UnitMoved { .. } => Some(SoundEffect::Step),
            GameEvent::Reloaded { .. } => Some(SoundEffect::Reload),
            GameEvent::StanceChanged { .. } => Some(SoundEffect::Shuffle),
            GameEvent::ReactionFire { .. } => Some(SoundEffect::Reaction),
            GameEvent::TurnStarted { .. } => Some(SoundEffect::TurnStart),
            GameEvent::AlienTurnStarted { .. } => Some(SoundEffect::AlienTurn),
            GameEvent::Victory { .. } => Some(SoundEffect::Victory),
            GameEvent::Defeat { .. } => Some(SoundEffect::Defeat),
            GameEvent::MissionStarted { .. } | GameEvent::TurnEnded { .. } => None,
        }
    }

    /// Voices making up the effect
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundEffect::Hit => HIT,
            SoundEffect::Miss => MISS,
            SoundEffect::Death => DEATH,
            SoundEffect::Step => STEP,
            SoundEffect::Reload => RELOAD,
            SoundEffect::Shuffle => SHUFFLE,
            SoundEffect::Reaction => REACTION,
            SoundEffect::TurnStart => TURN_START,
            SoundEffect::AlienTurn => ALIEN_TURN,
            SoundEffect::Victory => VICTORY,
            SoundEffect::Defeat => DEFEAT,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use player::AudioManager;

#[cfg(target_arch = "wasm32")]
mod player {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Wave};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
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
                volume: Settings::default().effective_volume(),
            }
        }

        /// Pick up volume and mute from settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            for tone in effect.tones() {
                self.play_tone(ctx, tone);
            }
        }

        /// Create an oscillator routed through its own gain node
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

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let osc_type = match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq_start, osc_type) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;
            let end = t + tone.duration;

            gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
            gain.gain().set_value_at_time(self.volume * tone.gain, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
            if tone.freq_end != tone.freq_start {
                osc.frequency().set_value_at_time(tone.freq_start, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.freq_end, end)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.02).ok();
        }
    }
}
