//! Audio cues using the Web Audio API
//!
//! Procedurally generated effects, so no sound files are needed. Each cue
//! plays with a slightly randomised pitch.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::SoundCue;

/// Pitch rate range applied per playback
const RATE_MIN: f32 = 0.95;
const RATE_MAX: f32 = 1.05;

/// Plays the game's sound cues
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
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn play(&self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let rate = RATE_MIN + (RATE_MAX - RATE_MIN) * js_sys::Math::random() as f32;
        match cue {
            SoundCue::Bounce => self.play_bounce(ctx, vol, rate),
            SoundCue::PlatformBreak => self.play_break(ctx, vol, rate),
            SoundCue::HazardHit => self.play_hazard(ctx, vol, rate),
        }
    }

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

    /// Soft thump on solid floor
    fn play_bounce(&self, ctx: &AudioContext, vol: f32, rate: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 180.0 * rate, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(70.0 * rate, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Crack and shimmer as a platform shatters
    fn play_break(&self, ctx: &AudioContext, vol: f32, rate: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 120.0 * rate, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                .ok();
            for (i, freq) in [2500.0, 180.0, 3000.0, 120.0, 2000.0].iter().enumerate() {
                let at = t + 0.015 * (i + 1) as f64;
                osc.frequency().set_value_at_time(freq * rate, at).ok();
            }
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        for (i, freq) in [1200.0, 1800.0].iter().enumerate() {
            if let Some((osc, gain)) = self.create_osc(ctx, freq * rate, OscillatorType::Sine) {
                let start = t + i as f64 * 0.03;
                gain.gain().set_value_at_time(vol * 0.15, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.3).ok();
            }
        }
    }

    /// Harsh descending buzz when the run ends
    fn play_hazard(&self, ctx: &AudioContext, vol: f32, rate: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 400.0 * rate, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0 * rate, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.55).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 70.0 * rate, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }
    }
}
