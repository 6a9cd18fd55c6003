//! Hardware-style synth panel: a play toggle, a waveform selector, and two
//! knobs for frequency and volume.
//!
//! Unlike the other controls the note is latched: it starts and stops with
//! the play button, and knob gestures only retune it. Knobs are relative: a
//! drag changes the value by how far the pointer moved from where the drag
//! started, so grabbing a knob never makes it jump.

use crate::{
    config::ControlTuning,
    dsp::Waveform,
    gesture::{frequency_to_t, knob_angle, relative_drag, Band, Bounds, Curve, Normalized, Point, KNOB_TRAVEL},
};

use super::{GestureMapping, Press, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobId {
    Frequency,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knob {
    bounds: Bounds,
    range: Band,
    value: f32,
    /// Pointer y and value at the start of the current drag.
    grab: Option<(f32, f32)>,
}

impl Knob {
    pub fn new(range: Band, value: f32) -> Self {
        Self {
            bounds: Bounds::default(),
            range,
            value: value.clamp(range.min, range.max),
            grab: None,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn range(&self) -> Band {
        self.range
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Indicator rotation in degrees.
    pub fn angle(&self) -> f32 {
        knob_angle(self.value, self.range.min, self.range.max)
    }

    fn sensitivity(&self) -> f32 {
        (self.range.max - self.range.min) / KNOB_TRAVEL
    }

    fn grab(&mut self, at: Point) {
        self.grab = Some((at.y, self.value));
    }

    fn drag(&mut self, at: Point) -> bool {
        let Some((anchor, start)) = self.grab else {
            return false;
        };
        self.value = relative_drag(start, anchor, at.y, self.sensitivity(), self.range.min, self.range.max);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthFeedback {
    pub playing: bool,
    pub waveform: Waveform,
    pub frequency: f32,
    pub volume: f32,
    pub frequency_angle: f32,
    pub volume_angle: f32,
    pub dragging: Option<KnobId>,
}

#[derive(Debug, Clone)]
pub struct SynthPanel {
    frequency: Knob,
    volume: Knob,
    waveform: Waveform,
    play_button: Bounds,
    waveform_buttons: [Bounds; 4],
    active: Option<KnobId>,
}

impl SynthPanel {
    pub fn new(tuning: ControlTuning) -> Self {
        Self {
            frequency: Knob::new(tuning.synth_band, tuning.synth_frequency),
            volume: Knob::new(tuning.synth_volume, tuning.synth_level),
            waveform: tuning.synth_waveform,
            play_button: Bounds::default(),
            waveform_buttons: [Bounds::default(); 4],
            active: None,
        }
    }

    pub fn set_bounds(&mut self, frequency: Bounds, volume: Bounds) {
        self.frequency.bounds = frequency;
        self.volume.bounds = volume;
    }

    /// Play toggle and one button per entry of [`Waveform::ALL`].
    pub fn set_buttons(&mut self, play: Bounds, waveforms: [Bounds; 4]) {
        self.play_button = play;
        self.waveform_buttons = waveforms;
    }

    pub fn knob(&self, id: KnobId) -> &Knob {
        match id {
            KnobId::Frequency => &self.frequency,
            KnobId::Volume => &self.volume,
        }
    }

    fn knob_mut(&mut self, id: KnobId) -> &mut Knob {
        match id {
            KnobId::Frequency => &mut self.frequency,
            KnobId::Volume => &mut self.volume,
        }
    }

    pub fn play_button(&self) -> Bounds {
        self.play_button
    }

    pub fn waveform_buttons(&self) -> [Bounds; 4] {
        self.waveform_buttons
    }

    /// Returns `true` if the waveform changed.
    pub fn select_waveform(&mut self, waveform: Waveform) -> bool {
        if self.waveform == waveform {
            return false;
        }
        log::debug!("synth waveform {} -> {}", self.waveform, waveform);
        self.waveform = waveform;
        true
    }

    fn current(&self) -> Tone {
        Tone::new(self.frequency.value, self.volume.value)
    }
}

impl GestureMapping for SynthPanel {
    type Feedback = SynthFeedback;

    fn waveform(&self) -> Waveform {
        self.waveform
    }

    fn press(&mut self, at: Point) -> Press {
        if self.play_button.contains(at) {
            return Press::Toggle;
        }
        let selected = self.waveform_buttons.iter().position(|b| b.contains(at));
        if let Some(index) = selected {
            return if self.select_waveform(Waveform::ALL[index]) {
                Press::Restart
            } else {
                Press::Miss
            };
        }
        let knob = [KnobId::Frequency, KnobId::Volume]
            .into_iter()
            .find(|&id| self.knob(id).bounds.contains(at));
        match knob {
            Some(id) => {
                self.knob_mut(id).grab(at);
                self.active = Some(id);
                Press::Adjust(self.current())
            }
            None => Press::Miss,
        }
    }

    fn drag(&mut self, at: Point) -> Option<Tone> {
        let id = self.active?;
        self.knob_mut(id).drag(at).then(|| self.current())
    }

    fn lift(&mut self) {
        self.frequency.grab = None;
        self.volume.grab = None;
        self.active = None;
    }

    fn tone(&self) -> Option<Tone> {
        Some(self.current())
    }

    fn ends_on_leave(&self) -> bool {
        false
    }

    fn position(&self) -> Normalized {
        Normalized::Two(
            frequency_to_t(self.frequency.value, self.frequency.range, Curve::Linear),
            frequency_to_t(self.volume.value, self.volume.range, Curve::Linear),
        )
    }

    fn feedback(&self, sounding: bool) -> SynthFeedback {
        SynthFeedback {
            playing: sounding,
            waveform: self.waveform,
            frequency: self.frequency.value,
            volume: self.volume.value,
            frequency_angle: self.frequency.angle(),
            volume_angle: self.volume.angle(),
            dragging: self.active,
        }
    }
}
