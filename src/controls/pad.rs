//! Two-axis theremin pad: horizontal is pitch on an exponential band,
//! vertical is loudness with the top of the pad loudest.

use crate::{
    config::ControlTuning,
    dsp::Waveform,
    gesture::{normalize_2d, to_frequency, to_gain, Band, Bounds, Curve, Normalized, Orientation, Point},
};

use super::{GestureMapping, Press, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PadFeedback {
    pub active: bool,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct PadMapping {
    bounds: Bounds,
    band: Band,
    curve: Curve,
    gain: Band,
    waveform: Waveform,
    touch: Option<(f32, f32)>,
    position: (f32, f32),
}

impl PadMapping {
    pub fn new(tuning: ControlTuning) -> Self {
        Self {
            bounds: Bounds::default(),
            band: tuning.pad_band,
            curve: tuning.pad_curve,
            gain: tuning.pad_gain,
            waveform: tuning.pad_waveform,
            touch: None,
            position: (0.0, 0.0),
        }
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn band(&self) -> Band {
        self.band
    }

    fn tone_at(&mut self, at: Point) -> Tone {
        let (x, y) = normalize_2d(at, self.bounds, Orientation::Forward, Orientation::Inverted);
        self.position = (x, y);
        self.touch = Some((x, y));
        Tone::new(to_frequency(x, self.band, self.curve), to_gain(y, self.gain.min, self.gain.max))
    }
}

impl GestureMapping for PadMapping {
    type Feedback = PadFeedback;

    fn waveform(&self) -> Waveform {
        self.waveform
    }

    fn press(&mut self, at: Point) -> Press {
        if !self.bounds.contains(at) {
            return Press::Miss;
        }
        Press::Sound(self.tone_at(at))
    }

    fn drag(&mut self, at: Point) -> Option<Tone> {
        self.touch?;
        Some(self.tone_at(at))
    }

    fn lift(&mut self) {
        self.touch = None;
    }

    fn position(&self) -> Normalized {
        Normalized::Two(self.position.0, self.position.1)
    }

    fn feedback(&self, sounding: bool) -> PadFeedback {
        PadFeedback {
            active: sounding,
            x: self.position.0,
            y: self.position.1,
        }
    }
}
