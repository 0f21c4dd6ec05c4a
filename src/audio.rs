//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. Cues are
//! driven entirely from drained `GameEvent`s; the simulation never calls in
//! here.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Flap impulse
    Flap,
    /// Gate cleared
    Score,
    /// Terminal collision
    Crash,
    /// Session ended with a new best score
    NewBest,
}

impl SoundEffect {
    /// Map a simulation event to its cue, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flapped => Some(SoundEffect::Flap),
            GameEvent::Scored { .. } => Some(SoundEffect::Score),
            GameEvent::SessionEnded { new_best: true, .. } => Some(SoundEffect::NewBest),
            GameEvent::SessionEnded { .. } => Some(SoundEffect::Crash),
            GameEvent::Started => None,
        }
    }
}

/// Plays cues through a shared `AudioContext`; silently inert when the
/// context cannot be created (insecure context, headless browser)
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("no AudioContext, sound disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            muted: false,
        }
    }

    /// Resume the context; browsers keep it suspended until a user gesture
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Play a cue at the current volume
    pub fn play(&self, effect: SoundEffect) {
        if self.muted || self.volume <= 0.0 {
            return;
        }
        let vol = self.volume;

        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Flap => self.play_flap(ctx, vol),
            SoundEffect::Score => self.play_score(ctx, vol),
            SoundEffect::Crash => self.play_crash(ctx, vol),
            SoundEffect::NewBest => self.play_new_best(ctx, vol),
        }
    }

    /// Oscillator wired through a gain node to the output
    fn osc_with_gain(
        &self,
        ctx: &AudioContext,
        freq: f32,
        shape: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(shape);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some((osc, gain))
    }

    /// Flap - quick upward chirp
    fn play_flap(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.osc_with_gain(ctx, 400.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(800.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Score - two-note ding
    fn play_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [520.0, 680.0].into_iter().enumerate() {
            let Some((osc, gain)) = self.osc_with_gain(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time() + i as f64 * 0.1;

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Crash - falling saw buzz
    fn play_crash(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.osc_with_gain(ctx, 400.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.5).ok();
    }

    /// New best - short ascending fanfare
    fn play_new_best(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].into_iter().enumerate() {
            let Some((osc, gain)) = self.osc_with_gain(ctx, freq, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time() + i as f64 * 0.09;

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}
