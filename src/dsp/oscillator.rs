use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PlaygroundError;

/*
Oscillator Waveforms
====================

Every voice in the playground is a single oscillator. Its timbre comes only
from the waveform shape:

  Sine       fundamental only; soft, whistle-like
  Sawtooth   every harmonic at 1/n; bright and buzzy
  Square     odd harmonics at 1/n; hollow, reedy
  Triangle   odd harmonics at 1/n²; between sine and square

Sine, sawtooth and triangle start at zero and rise. Square has no zero
crossing to start on: it sits at +1 for the first half cycle and -1 for the
second, so its onset is a step and relies on the gain ramp. Phase is kept as a fraction of a cycle in [0, 1):

    phase += frequency / sample_rate     (once per sample, wrapped)

Frequency is read once per block. A new frequency therefore takes effect on
the next block, and because phase is continuous the pitch change itself is
glitch-free. Changing the waveform of a running oscillator is not offered:
the output would jump between shapes mid-cycle, so callers restart the voice.
*/

/// Oscillator shape of a voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Sawtooth,
    Square,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Sawtooth,
        Waveform::Square,
        Waveform::Triangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
        }
    }

    /// Single-glyph label for compact selectors.
    pub fn glyph(self) -> &'static str {
        match self {
            Waveform::Sine => "∿",
            Waveform::Sawtooth => "⩘",
            Waveform::Square => "⊓",
            Waveform::Triangle => "△",
        }
    }

    /// Evaluate the waveform at `phase` (fraction of a cycle, [0, 1)).
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Sawtooth => 2.0 * (phase - (phase + 0.5).floor()),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Waveform {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" => Ok(Waveform::Sine),
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            "square" => Ok(Waveform::Square),
            "triangle" => Ok(Waveform::Triangle),
            _ => Err(PlaygroundError::UnknownWaveform(s.to_string())),
        }
    }
}

/// Phase-accumulating oscillator. Allocation-free.
#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Restart at phase zero with a (possibly different) shape.
    pub fn reset(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        self.phase = 0.0;
    }

    /// Fill `out` with one block at a fixed `frequency`.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        let increment = frequency / sample_rate;
        for sample in out.iter_mut() {
            *sample = self.waveform.sample(self.phase);
            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
        }
    }
}
