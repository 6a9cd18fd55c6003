//! Frame geometry for the ambient waveform background.
//!
//! The renderer never draws pixels itself. Each tick it builds a
//! [`FrameGeometry`] in logical units and hands it to a [`DrawSurface`], which
//! may be a terminal canvas, an image buffer, or a test recorder.

pub mod waveform;

use crate::config::FreezeBoost;

pub use waveform::{WaveLayer, WaveformFrame, WaveformRenderer, DEFAULT_LAYERS};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Apply a saturation and brightness multiplier, HSL-style: saturation
    /// scales the distance from grey, brightness scales every channel.
    pub fn boosted(self, boost: FreezeBoost) -> Rgb {
        let channels = [self.0, self.1, self.2].map(f32::from);
        let grey = channels.iter().sum::<f32>() / 3.0;
        let [r, g, b] = channels.map(|c| {
            let saturated = grey + (c - grey) * boost.saturation;
            (saturated * boost.brightness).round().clamp(0.0, 255.0) as u8
        });
        Rgb(r, g, b)
    }
}

/// Stroke colour of every layer.
pub const STROKE: Rgb = Rgb(255, 107, 43);

/// One polyline of the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPath {
    /// `(x, y)` in logical units, left to right.
    pub points: Vec<(f32, f32)>,
    pub color: Rgb,
    pub opacity: f32,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameGeometry {
    pub width: f32,
    pub height: f32,
    pub layers: Vec<LayerPath>,
    /// Present while the waveform is frozen.
    pub boost: Option<FreezeBoost>,
}

impl FrameGeometry {
    pub fn is_frozen(&self) -> bool {
        self.boost.is_some()
    }
}

/// Anything a frame can be drawn on.
pub trait DrawSurface {
    fn draw(&mut self, frame: &FrameGeometry);
}

/// Keeps the last frame. Handy for hosts that draw on their own schedule.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    last: Option<FrameGeometry>,
    frames: usize,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&FrameGeometry> {
        self.last.as_ref()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl DrawSurface for FrameRecorder {
    fn draw(&mut self, frame: &FrameGeometry) {
        self.last = Some(frame.clone());
        self.frames += 1;
    }
}
