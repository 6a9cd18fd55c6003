//! One-octave piano keyboard, C4 to C5.
//!
//! Eight white keys share the width equally. Black keys sit on the top part
//! of the keyboard, centred on the boundary between their two white
//! neighbours, and win over the white key underneath.

use crate::{
    config::ControlTuning,
    dsp::Waveform,
    gesture::{normalize_2d, Bounds, Normalized, Orientation, Point},
};

use super::{GestureMapping, Press, Retrigger, Tone};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Key {
    pub name: &'static str,
    pub frequency: f32,
    pub black: bool,
}

const fn white(name: &'static str, frequency: f32) -> Key {
    Key {
        name,
        frequency,
        black: false,
    }
}

const fn black(name: &'static str, frequency: f32) -> Key {
    Key {
        name,
        frequency,
        black: true,
    }
}

/// Chromatic keys in pitch order.
pub const KEYS: [Key; 13] = [
    white("C4", 261.63),
    black("C#4", 277.18),
    white("D4", 293.66),
    black("D#4", 311.13),
    white("E4", 329.63),
    white("F4", 349.23),
    black("F#4", 369.99),
    white("G4", 392.00),
    black("G#4", 415.30),
    white("A4", 440.00),
    black("A#4", 466.16),
    white("B4", 493.88),
    white("C5", 523.25),
];

const WHITE_KEYS: usize = 8;

/// Fraction of the keyboard height covered by black keys.
pub const BLACK_KEY_DEPTH: f32 = 0.6;
/// Black key width as a fraction of a white key.
pub const BLACK_KEY_WIDTH: f32 = 0.6;

/// Index into [`KEYS`] of every white key, left to right.
pub fn white_keys() -> impl Iterator<Item = usize> {
    KEYS.iter().enumerate().filter(|(_, k)| !k.black).map(|(i, _)| i)
}

/// Black keys with the white-key boundary (1..8) they sit on.
pub fn black_keys() -> impl Iterator<Item = (usize, usize)> {
    let mut whites_seen = 0;
    KEYS.iter().enumerate().filter_map(move |(i, k)| {
        if k.black {
            Some((i, whites_seen))
        } else {
            whites_seen += 1;
            None
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardFeedback {
    /// Key drawn as pressed.
    pub pressed: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct KeyboardMapping {
    bounds: Bounds,
    gain: f32,
    waveform: Waveform,
    held: Option<usize>,
    position: Normalized,
}

impl KeyboardMapping {
    pub fn new(tuning: ControlTuning) -> Self {
        Self {
            bounds: Bounds::default(),
            gain: tuning.keyboard_gain,
            waveform: tuning.keyboard_waveform,
            held: None,
            position: Normalized::default(),
        }
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Key under `at`, if any.
    pub fn key_at(&self, at: Point) -> Option<usize> {
        if !self.bounds.contains(at) {
            return None;
        }
        let (x, y) = normalize_2d(at, self.bounds, Orientation::Forward, Orientation::Forward);
        let white_width = 1.0 / WHITE_KEYS as f32;
        if y < BLACK_KEY_DEPTH {
            let half = white_width * BLACK_KEY_WIDTH / 2.0;
            let hit = black_keys().find(|&(_, boundary)| (x - boundary as f32 * white_width).abs() < half);
            if let Some((index, _)) = hit {
                return Some(index);
            }
        }
        let column = ((x / white_width) as usize).min(WHITE_KEYS - 1);
        white_keys().nth(column)
    }

    fn play(&mut self, at: Point) -> Option<Tone> {
        let index = self.key_at(at)?;
        let (x, y) = normalize_2d(at, self.bounds, Orientation::Forward, Orientation::Forward);
        self.position = Normalized::Two(x, y);
        self.held = Some(index);
        Some(Tone::new(KEYS[index].frequency, self.gain).note(index))
    }
}

impl GestureMapping for KeyboardMapping {
    type Feedback = KeyboardFeedback;

    fn waveform(&self) -> Waveform {
        self.waveform
    }

    fn press(&mut self, at: Point) -> Press {
        self.play(at).map_or(Press::Miss, Press::Sound)
    }

    fn drag(&mut self, at: Point) -> Option<Tone> {
        self.play(at)
    }

    fn lift(&mut self) {
        self.held = None;
    }

    fn retrigger(&self) -> Retrigger {
        Retrigger::Discrete
    }

    fn position(&self) -> Normalized {
        self.position
    }

    fn feedback(&self, sounding: bool) -> KeyboardFeedback {
        KeyboardFeedback {
            pressed: if sounding { self.held } else { None },
        }
    }
}
