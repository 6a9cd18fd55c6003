//! Tunable policy for the playground.
//!
//! Durations and bands here are behaviour knobs, not protocol: the release
//! fade only has to be long enough to avoid a click, and the freeze only has
//! to be long enough to be seen. Everything has a default matching the
//! stock playground; override with the builder methods.
//!
//! ```
//! use std::time::Duration;
//! use gesture_synth::config::PlaygroundConfig;
//!
//! let config = PlaygroundConfig::new()
//!     .release_fade(Duration::from_millis(150))
//!     .freeze_duration(Duration::from_secs(1));
//! assert_eq!(config.freeze.duration, Duration::from_secs(1));
//! ```

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::Waveform,
    engine::EngineSettings,
    gesture::{Band, Curve},
    render::waveform::{WaveLayer, DEFAULT_LAYERS},
    synth::sequence::NoteSequence,
};

/// How a gesture-held voice ends.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleasePolicy {
    /// Length of the exponential fade.
    pub fade: Duration,
    /// Extra time after the fade before the generator is torn down.
    pub guard: Duration,
}

impl ReleasePolicy {
    /// Delay from release to disposal.
    pub fn disposal_delay(&self) -> Duration {
        self.fade + self.guard
    }
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        Self {
            fade: Duration::from_millis(100),
            guard: Duration::from_millis(20),
        }
    }
}

/// Colour boost drawn while the waveform is frozen.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezeBoost {
    pub saturation: f32,
    pub brightness: f32,
}

impl Default for FreezeBoost {
    fn default() -> Self {
        Self {
            saturation: 1.8,
            brightness: 1.4,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezePolicy {
    pub duration: Duration,
    pub boost: FreezeBoost,
}

impl Default for FreezePolicy {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(800),
            boost: FreezeBoost::default(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Time units added per unfrozen tick.
    pub tick_increment: f64,
    /// Horizontal distance between path points, in surface units.
    pub sample_step: f32,
    pub layers: Vec<WaveLayer>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            tick_increment: 0.02,
            sample_step: 2.0,
            layers: DEFAULT_LAYERS.to_vec(),
        }
    }
}

/// Bands and levels of the stock controls.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlTuning {
    pub keyboard_gain: f32,
    pub keyboard_waveform: Waveform,

    pub stem_band: Band,
    pub stem_gain: f32,
    /// Gain range swept by the mouth (secondary axis) while the stem sounds.
    pub mouth_gain: Band,

    pub synth_band: Band,
    pub synth_volume: Band,
    pub synth_frequency: f32,
    pub synth_level: f32,
    pub synth_waveform: Waveform,

    pub pad_band: Band,
    pub pad_curve: Curve,
    pub pad_gain: Band,
    pub pad_waveform: Waveform,
}

impl Default for ControlTuning {
    fn default() -> Self {
        Self {
            keyboard_gain: 0.3,
            keyboard_waveform: Waveform::Sine,

            stem_band: Band::new(200.0, 800.0),
            stem_gain: 0.25,
            mouth_gain: Band::new(0.1, 0.4),

            synth_band: Band::new(80.0, 880.0),
            synth_volume: Band::new(0.0, 0.5),
            synth_frequency: 220.0,
            synth_level: 0.3,
            synth_waveform: Waveform::Sawtooth,

            pad_band: Band::new(110.0, 880.0),
            pad_curve: Curve::Exponential,
            pad_gain: Band::new(0.0, 0.4),
            pad_waveform: Waveform::Triangle,
        }
    }
}

/// Everything the playground needs to know, with stock defaults.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaygroundConfig {
    pub release: ReleasePolicy,
    pub freeze: FreezePolicy,
    pub renderer: RendererConfig,
    pub engine: EngineSettings,
    pub controls: ControlTuning,
    pub sequence: NoteSequence,
}

impl PlaygroundConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn release_fade(mut self, fade: Duration) -> Self {
        self.release.fade = fade;
        self
    }

    pub fn release_guard(mut self, guard: Duration) -> Self {
        self.release.guard = guard;
        self
    }

    pub fn freeze_duration(mut self, duration: Duration) -> Self {
        self.freeze.duration = duration;
        self
    }

    pub fn tick_increment(mut self, increment: f64) -> Self {
        self.renderer.tick_increment = increment;
        self
    }

    pub fn voice_capacity(mut self, voices: usize) -> Self {
        self.engine.voice_capacity = voices;
        self
    }

    pub fn controls(mut self, controls: ControlTuning) -> Self {
        self.controls = controls;
        self
    }

    pub fn sequence(mut self, sequence: NoteSequence) -> Self {
        self.sequence = sequence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_playground() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.release.disposal_delay(), Duration::from_millis(120));
        assert_eq!(config.freeze.duration, Duration::from_millis(800));
        assert_eq!(config.renderer.tick_increment, 0.02);
        assert_eq!(config.renderer.layers.len(), 6);
        assert_eq!(config.controls.stem_band, Band::new(200.0, 800.0));
    }

    #[test]
    fn builder_overrides_single_fields() {
        let config = PlaygroundConfig::new()
            .release_fade(Duration::from_millis(150))
            .release_guard(Duration::ZERO)
            .tick_increment(0.05)
            .voice_capacity(4);
        assert_eq!(config.release.disposal_delay(), Duration::from_millis(150));
        assert_eq!(config.renderer.tick_increment, 0.05);
        assert_eq!(config.engine.voice_capacity, 4);
        assert_eq!(config.freeze, FreezePolicy::default());
    }
}
