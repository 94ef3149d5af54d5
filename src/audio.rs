//! Sound effects
//!
//! The simulation only says *what* to play and how loud through
//! [`AudioSink`]. Every effect is a single procedurally generated tone
//! described by a [`ToneRecipe`], so a backend needs no sample files.
//! [`AudioManager`] applies master volume and mute and queues tones for the
//! platform layer to drain; [`ToneRecipe::render`] turns a recipe into mono
//! PCM for backends without an oscillator API.

use std::f32::consts::TAU;

use serde::Serialize;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SoundEffect {
    /// Trigger pulled (not used for tracking auto-fire)
    Shoot,
    /// Kill
    Hit,
    /// Head kill, or head tick in tracking
    Headshot,
    /// Damage without a kill
    BodyHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// Shape of a frequency sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// Oscillator settings for one effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneRecipe {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds from `start_hz` to `end_hz`
    pub sweep_secs: f32,
    pub ramp: Ramp,
    /// Peak gain at full volume
    pub gain: f32,
    /// Gain the exponential decay ends on
    pub floor_gain: f32,
    pub duration_secs: f32,
    pub lowpass_hz: Option<f32>,
}

impl SoundEffect {
    pub fn recipe(self) -> ToneRecipe {
        match self {
            // Crisp mechanical click
            SoundEffect::Shoot => ToneRecipe {
                waveform: Waveform::Triangle,
                start_hz: 300.0,
                end_hz: 50.0,
                sweep_secs: 0.05,
                ramp: Ramp::Exponential,
                gain: 0.15,
                floor_gain: 0.01,
                duration_secs: 0.05,
                lowpass_hz: None,
            },
            // Ding
            SoundEffect::Hit => ToneRecipe {
                waveform: Waveform::Sine,
                start_hz: 1200.0,
                end_hz: 1200.0,
                sweep_secs: 0.0,
                ramp: Ramp::Linear,
                gain: 0.2,
                floor_gain: 0.001,
                duration_secs: 0.15,
                lowpass_hz: None,
            },
            // Metallic ping
            SoundEffect::Headshot => ToneRecipe {
                waveform: Waveform::Sine,
                start_hz: 1800.0,
                end_hz: 2200.0,
                sweep_secs: 0.05,
                ramp: Ramp::Linear,
                gain: 0.3,
                floor_gain: 0.001,
                duration_secs: 0.2,
                lowpass_hz: None,
            },
            // Dull thud
            SoundEffect::BodyHit => ToneRecipe {
                waveform: Waveform::Square,
                start_hz: 150.0,
                end_hz: 50.0,
                sweep_secs: 0.1,
                ramp: Ramp::Exponential,
                gain: 0.2,
                floor_gain: 0.001,
                duration_secs: 0.1,
                lowpass_hz: Some(400.0),
            },
        }
    }
}

impl ToneRecipe {
    /// Oscillator frequency `t` seconds into the tone
    pub fn frequency_at(&self, t: f32) -> f32 {
        if self.sweep_secs <= 0.0 {
            return self.start_hz;
        }
        if t >= self.sweep_secs {
            return self.end_hz;
        }
        let k = (t / self.sweep_secs).max(0.0);
        match self.ramp {
            Ramp::Linear => self.start_hz + (self.end_hz - self.start_hz) * k,
            Ramp::Exponential => self.start_hz * (self.end_hz / self.start_hz).powf(k),
        }
    }

    /// Envelope gain `t` seconds in, for a tone played at `volume`
    pub fn gain_at(&self, t: f32, volume: f32) -> f32 {
        let peak = self.gain * volume;
        if peak <= 0.0 || t >= self.duration_secs {
            return 0.0;
        }
        let k = (t / self.duration_secs).max(0.0);
        peak * (self.floor_gain / peak).powf(k)
    }

    /// Render the tone as mono samples in [-1, 1]
    pub fn render(&self, sample_rate: u32, volume: f32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let len = (self.duration_secs * rate).round() as usize;
        let mut out = Vec::with_capacity(len);

        // One-pole low-pass
        let alpha = self.lowpass_hz.map(|cutoff| {
            let rc = 1.0 / (TAU * cutoff);
            let dt = 1.0 / rate;
            dt / (rc + dt)
        });

        let mut phase = 0.0_f32;
        let mut filtered = 0.0_f32;
        for i in 0..len {
            let t = i as f32 / rate;
            let raw = match self.waveform {
                Waveform::Sine => (phase * TAU).sin(),
                Waveform::Square => {
                    if phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            };
            let sample = match alpha {
                Some(a) => {
                    filtered += a * (raw - filtered);
                    filtered
                }
                None => raw,
            };
            out.push(sample * self.gain_at(t, volume));

            phase = (phase + self.frequency_at(t) / rate).fract();
        }
        out
    }
}

/// Where the simulation sends sounds
pub trait AudioSink {
    /// `volume` is relative (0-1) before master volume
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// A tone waiting for the platform layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuedTone {
    pub effect: SoundEffect,
    pub recipe: ToneRecipe,
    /// Relative volume times master volume
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    muted: bool,
    queue: Vec<QueuedTone>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl AudioManager {
    pub fn new(master_volume: f32) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
            muted: false,
            queue: Vec::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    pub fn pending(&self) -> &[QueuedTone] {
        &self.queue
    }

    /// Hand every queued tone to the caller
    pub fn drain(&mut self) -> Vec<QueuedTone> {
        std::mem::take(&mut self.queue)
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        let vol = self.effective_volume() * volume.clamp(0.0, 1.0);
        if vol <= 0.0 {
            return;
        }
        self.queue.push(QueuedTone {
            effect,
            recipe: effect.recipe(),
            volume: vol,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_scales_by_master_volume() {
        let mut audio = AudioManager::new(0.5);
        audio.play(SoundEffect::BodyHit, 0.5);
        let tones = audio.drain();
        assert_eq!(tones.len(), 1);
        assert!((tones[0].volume - 0.25).abs() < 1e-6);
        assert!(audio.pending().is_empty());
    }

    #[test]
    fn test_mute_and_zero_volume_drop_tones() {
        let mut audio = AudioManager::new(1.0);
        audio.set_muted(true);
        audio.play(SoundEffect::Shoot, 1.0);
        assert!(audio.pending().is_empty());

        audio.set_muted(false);
        audio.set_master_volume(0.0);
        audio.play(SoundEffect::Shoot, 1.0);
        assert!(audio.pending().is_empty());
    }

    #[test]
    fn test_master_volume_clamped() {
        let mut audio = AudioManager::new(3.0);
        assert_eq!(audio.master_volume(), 1.0);
        audio.set_master_volume(-1.0);
        assert_eq!(audio.master_volume(), 0.0);
    }

    #[test]
    fn test_headshot_sweeps_up_linearly() {
        let r = SoundEffect::Headshot.recipe();
        assert_eq!(r.frequency_at(0.0), 1800.0);
        assert!((r.frequency_at(0.025) - 2000.0).abs() < 1e-2);
        assert_eq!(r.frequency_at(0.1), 2200.0);
    }

    #[test]
    fn test_shoot_sweeps_down_exponentially() {
        let r = SoundEffect::Shoot.recipe();
        let mid = r.frequency_at(0.025);
        // Geometric mean of 300 and 50
        assert!((mid - (300.0_f32 * 50.0).sqrt()).abs() < 0.5);
    }

    #[test]
    fn test_envelope_decays_to_floor() {
        let r = SoundEffect::Hit.recipe();
        assert!((r.gain_at(0.0, 1.0) - 0.2).abs() < 1e-6);
        assert!(r.gain_at(0.1, 1.0) < r.gain_at(0.05, 1.0));
        assert_eq!(r.gain_at(0.15, 1.0), 0.0);
        assert_eq!(r.gain_at(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_render_length_and_range() {
        for effect in [
            SoundEffect::Shoot,
            SoundEffect::Hit,
            SoundEffect::Headshot,
            SoundEffect::BodyHit,
        ] {
            let r = effect.recipe();
            let samples = r.render(48_000, 1.0);
            assert_eq!(samples.len(), (r.duration_secs * 48_000.0).round() as usize);
            assert!(samples.iter().all(|s| s.abs() <= r.gain + 1e-6));
            assert!(samples.iter().any(|s| s.abs() > 0.0));
        }
    }

    #[test]
    fn test_null_audio_accepts_anything() {
        let mut sink = NullAudio;
        sink.play(SoundEffect::Hit, 1.0);
    }
}
