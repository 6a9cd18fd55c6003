//! The flower stem: a vertical pitch strip with a mouth above it.
//!
//! Pressing the stem plays a sine whose pitch follows the pointer up and
//! down the stem, higher on screen meaning higher in pitch. The mouth is a
//! hover area: its vertical position opens the mouth and sets the gain of a
//! sounding stem voice. It never starts a voice on its own.

use crate::{
    config::ControlTuning,
    dsp::Waveform,
    gesture::{normalize_1d, to_frequency, to_gain, Band, Bounds, Curve, Normalized, Orientation, Point},
};

use super::{GestureMapping, Press, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StemFeedback {
    pub pressed: bool,
    /// Indicator height along the stem, 0 at the bottom.
    pub pitch: f32,
    /// How far the mouth is open, 0 closed.
    pub mouth_open: f32,
}

#[derive(Debug, Clone)]
pub struct StemMapping {
    stem: Bounds,
    mouth: Bounds,
    band: Band,
    gain: f32,
    mouth_gain: Band,
    current_gain: f32,
    pitch: f32,
    mouth_open: f32,
    pressed: bool,
}

impl StemMapping {
    pub fn new(tuning: ControlTuning) -> Self {
        Self {
            stem: Bounds::default(),
            mouth: Bounds::default(),
            band: tuning.stem_band,
            gain: tuning.stem_gain,
            mouth_gain: tuning.mouth_gain,
            current_gain: tuning.stem_gain,
            pitch: 0.5,
            mouth_open: 0.0,
            pressed: false,
        }
    }

    pub fn set_bounds(&mut self, stem: Bounds, mouth: Bounds) {
        self.stem = stem;
        self.mouth = mouth;
    }

    pub fn stem(&self) -> Bounds {
        self.stem
    }

    pub fn mouth(&self) -> Bounds {
        self.mouth
    }

    fn tone_at(&mut self, at: Point) -> Tone {
        self.pitch = normalize_1d(at.y, self.stem.y, self.stem.height, Orientation::Inverted);
        Tone::new(to_frequency(self.pitch, self.band, Curve::Linear), self.current_gain)
    }
}

impl GestureMapping for StemMapping {
    type Feedback = StemFeedback;

    fn waveform(&self) -> Waveform {
        Waveform::Sine
    }

    fn press(&mut self, at: Point) -> Press {
        if !self.stem.contains(at) {
            return Press::Miss;
        }
        self.pressed = true;
        self.current_gain = self.gain;
        Press::Sound(self.tone_at(at))
    }

    fn drag(&mut self, at: Point) -> Option<Tone> {
        self.pressed.then(|| self.tone_at(at))
    }

    fn lift(&mut self) {
        self.pressed = false;
    }

    fn hover(&mut self, at: Option<Point>) -> Option<f32> {
        match at {
            Some(p) if self.mouth.contains(p) => {
                self.mouth_open = normalize_1d(p.y, self.mouth.y, self.mouth.height, Orientation::Forward);
                self.current_gain = to_gain(self.mouth_open, self.mouth_gain.min, self.mouth_gain.max);
                Some(self.current_gain)
            }
            _ => {
                self.mouth_open = 0.0;
                None
            }
        }
    }

    fn position(&self) -> Normalized {
        Normalized::One(self.pitch)
    }

    fn feedback(&self, sounding: bool) -> StemFeedback {
        StemFeedback {
            pressed: sounding && self.pressed,
            pitch: self.pitch,
            mouth_open: self.mouth_open,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        config::ReleasePolicy,
        controls::{test_support::offline_engine, ControlId, Controller, ReleaseTask},
        engine::Scheduler,
        synth::Voice,
    };

    fn stem() -> StemMapping {
        let mut m = StemMapping::new(ControlTuning::default());
        m.set_bounds(Bounds::new(0.0, 20.0, 10.0, 100.0), Bounds::new(0.0, 0.0, 10.0, 20.0));
        m
    }

    #[test]
    fn top_of_stem_is_highest_pitch() {
        let mut m = stem();
        assert_eq!(m.press(Point::new(5.0, 20.0)), Press::Sound(Tone::new(800.0, 0.25)));
        assert_eq!(m.drag(Point::new(5.0, 120.0)).map(|t| t.frequency), Some(200.0));
        assert_eq!(m.drag(Point::new(5.0, 70.0)).map(|t| t.frequency), Some(500.0));
    }

    #[test]
    fn dragging_past_the_ends_clamps() {
        let mut m = stem();
        m.press(Point::new(5.0, 60.0));
        assert_eq!(m.drag(Point::new(5.0, -500.0)).map(|t| t.frequency), Some(800.0));
        assert_eq!(m.drag(Point::new(50.0, 9_000.0)).map(|t| t.frequency), Some(200.0));
    }

    #[test]
    fn mouth_press_is_a_miss() {
        let mut m = stem();
        assert_eq!(m.press(Point::new(5.0, 5.0)), Press::Miss);
        assert_eq!(m.drag(Point::new(5.0, 60.0)), None);
    }

    #[test]
    fn mouth_hover_sweeps_gain() {
        let mut m = stem();
        assert_eq!(m.hover(Some(Point::new(5.0, 0.0))), Some(0.1));
        let open = m.hover(Some(Point::new(5.0, 10.0))).unwrap_or_default();
        assert!((open - 0.25).abs() < 1e-6);
        assert!((m.feedback(false).mouth_open - 0.5).abs() < 1e-6);

        assert_eq!(m.hover(Some(Point::new(5.0, 50.0))), None);
        assert_eq!(m.feedback(false).mouth_open, 0.0);
    }

    #[test]
    fn mouth_modulates_a_sounding_stem() {
        let (engine, _tap) = offline_engine();
        let mut c = Controller::new(ControlId::Stem, stem(), engine, ReleasePolicy::default());
        let mut s: Scheduler<ReleaseTask> = Scheduler::new();

        c.hover(Some(Point::new(5.0, 19.0)));
        assert!(c.voice().is_none(), "hover alone never sounds");

        c.press(Point::new(5.0, 70.0), Duration::ZERO, &mut s);
        c.hover(Some(Point::new(5.0, 0.0)));
        assert_eq!(c.voice().map(Voice::gain), Some(0.1));

        // a later drag keeps the mouth gain
        c.drag(Point::new(5.0, 30.0), &mut s);
        assert_eq!(c.voice().map(Voice::gain), Some(0.1));
        assert!(c.feedback().pressed);
    }

    #[test]
    fn drag_sweep_is_monotonic() {
        let (engine, _tap) = offline_engine();
        let mut c = Controller::new(ControlId::Stem, stem(), engine, ReleasePolicy::default());
        let mut s: Scheduler<ReleaseTask> = Scheduler::new();

        c.press(Point::new(5.0, 119.0), Duration::ZERO, &mut s);
        let mut previous = 0.0;
        for step in 0..=100 {
            c.drag(Point::new(5.0, 120.0 - step as f32), &mut s);
            let f = c.voice().map(Voice::frequency).unwrap_or_default();
            assert!(f >= previous);
            previous = f;
        }
        assert_eq!(previous, 800.0);
    }
}
