/*
The background is a stack of sine layers, each drawn as a polyline across the
full width:

    y(x) = h/2 + sin(nx·f + t·s) · a · env
               + sin(nx·f/2 + t·s·1.3) · a · 0.3 · env

    nx  = x / width                 position across the surface, 0..1
    env = sin(π·nx)                 pins both ends to the centre line
    f   = spatial frequency         how many wiggles fit across
    s   = speed                     how fast the layer drifts with t
    a   = amplitude                 logical units

The second term is a slower, wider shadow of the first; it is what keeps the
layers from looking like plain sines. All layers share the same t, so their
relative motion comes only from their speeds.

t is an accumulator, not wall time. Every tick adds a fixed increment, unless
the surface is frozen, in which case t holds and the frame is still redrawn
(so a resize during a freeze shows the frozen shape at the new size).
*/

use std::{f32::consts::PI, time::Duration};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{FreezePolicy, RendererConfig};

use super::{DrawSurface, FrameGeometry, LayerPath, STROKE};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveLayer {
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
    pub opacity: f32,
    pub stroke_width: f32,
}

const fn layer(amplitude: f32, frequency: f32, speed: f32, opacity: f32, stroke_width: f32) -> WaveLayer {
    WaveLayer {
        amplitude,
        frequency,
        speed,
        opacity,
        stroke_width,
    }
}

/// Back to front.
pub const DEFAULT_LAYERS: [WaveLayer; 6] = [
    layer(30.0, 8.0, 1.2, 0.06, 1.0),
    layer(25.0, 6.0, 0.8, 0.08, 1.0),
    layer(40.0, 4.0, 1.0, 0.12, 1.5),
    layer(20.0, 12.0, 1.5, 0.15, 1.0),
    layer(35.0, 5.0, 0.9, 0.40, 2.0),
    layer(15.0, 10.0, 1.8, 0.20, 1.0),
];

impl WaveLayer {
    /// Height of the layer at normalized position `nx` and time `t`.
    pub fn y(&self, nx: f32, t: f32, height: f32) -> f32 {
        let env = (PI * nx).sin();
        let phase = t * self.speed;
        let primary = (nx * self.frequency + phase).sin() * self.amplitude * env;
        let shadow = (nx * self.frequency * 0.5 + phase * 1.3).sin() * self.amplitude * 0.3 * env;
        height * 0.5 + primary + shadow
    }
}

/// Animation state, separate from geometry so it survives a resize.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveformFrame {
    pub time_accumulator: f64,
    pub frozen_until: Option<Duration>,
}

impl WaveformFrame {
    pub fn is_frozen(&self, now: Duration) -> bool {
        self.frozen_until.is_some_and(|until| now < until)
    }
}

pub struct WaveformRenderer {
    frame: WaveformFrame,
    layers: Vec<WaveLayer>,
    tick_increment: f64,
    sample_step: f32,
    freeze: FreezePolicy,
    width: f32,
    height: f32,
    scale: f32,
}

impl WaveformRenderer {
    pub fn new(config: &RendererConfig, freeze: FreezePolicy) -> Self {
        Self {
            frame: WaveformFrame::default(),
            layers: config.layers.clone(),
            tick_increment: config.tick_increment,
            sample_step: config.sample_step.max(f32::EPSILON),
            freeze,
            width: 0.0,
            height: 0.0,
            scale: 1.0,
        }
    }

    /// Set the logical size and device scale. The animation state is left
    /// alone.
    pub fn resize(&mut self, width: f32, height: f32, scale: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.scale = if scale > 0.0 { scale } else { 1.0 };
        log::trace!("waveform resized to {:?}", self.backing_size());
    }

    /// Pixel size of the backing store: logical size times scale.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.scale).round() as u32,
            (self.height * self.scale).round() as u32,
        )
    }

    pub fn logical_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Hold the animation until `now` plus the freeze duration. Triggering
    /// again while frozen moves the end out.
    pub fn trigger_freeze(&mut self, now: Duration) {
        self.frame.frozen_until = Some(now + self.freeze.duration);
    }

    /// Advance (unless frozen) and draw.
    pub fn tick(&mut self, now: Duration, surface: &mut impl DrawSurface) {
        if !self.frame.is_frozen(now) {
            self.frame.frozen_until = None;
            self.frame.time_accumulator += self.tick_increment;
        }
        surface.draw(&self.geometry(now));
    }

    pub fn frame(&self) -> WaveformFrame {
        self.frame
    }

    /// Geometry for the current accumulator.
    pub fn geometry(&self, now: Duration) -> FrameGeometry {
        let t = self.frame.time_accumulator as f32;
        let boost = self.frame.is_frozen(now).then_some(self.freeze.boost);
        let color = boost.map_or(STROKE, |b| STROKE.boosted(b));
        let xs = self.sample_xs();
        let layers = self
            .layers
            .iter()
            .map(|layer| LayerPath {
                points: xs
                    .iter()
                    .map(|&x| (x, layer.y(x / self.width, t, self.height)))
                    .collect(),
                color,
                opacity: layer.opacity,
                stroke_width: layer.stroke_width,
            })
            .collect();
        FrameGeometry {
            width: self.width,
            height: self.height,
            layers,
            boost,
        }
    }

    fn sample_xs(&self) -> Vec<f32> {
        if self.width <= 0.0 {
            return Vec::new();
        }
        let count = (self.width / self.sample_step).floor() as usize + 1;
        (0..count).map(|i| i as f32 * self.sample_step).collect()
    }
}
