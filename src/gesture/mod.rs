//! Pointer geometry to audio parameters.
//!
//! Every function here is pure. A control describes its bounds and band, and
//! a gesture coordinate goes through two steps:
//!
//! 1. normalize: coordinate → `t` in [0, 1], clamped, optionally inverted
//! 2. scale: `t` → Hz or gain along the control's band and curve
//!
//! The clamp in step 1 is what keeps wild pointer positions (dragging far
//! outside a control, touch jitter, NaN from a zero-sized layout) from ever
//! reaching a voice as an invalid parameter.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pointer position in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned control bounds. `y` grows downward, as on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges belong to the
    /// neighbour.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Which end of an axis maps to `t = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Start of the axis (left / top) is 0.
    #[default]
    Forward,
    /// Start of the axis is 1. Vertical pitch controls use this so that
    /// higher on screen means higher in pitch.
    Inverted,
}

/// How `t` spreads across a frequency band.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    /// Equal Hz per unit of travel.
    #[default]
    Linear,
    /// Equal musical interval per unit of travel.
    Exponential,
}

/// Frequency range of a continuous control.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Normalized position a controller last mapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    One(f32),
    Two(f32, f32),
}

impl Default for Normalized {
    fn default() -> Self {
        Normalized::One(0.0)
    }
}

/// `clamp((coord - start) / length, 0, 1)`, flipped for inverted axes.
///
/// Degenerate input (zero or negative length, NaN) maps to the start of the
/// axis rather than producing NaN.
pub fn normalize_1d(coord: f32, axis_start: f32, axis_length: f32, orientation: Orientation) -> f32 {
    if axis_length.is_nan() || axis_length <= 0.0 {
        return orient(0.0, orientation);
    }
    let t = (coord - axis_start) / axis_length;
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    orient(t, orientation)
}

/// Normalize both axes of `p` within `bounds`.
pub fn normalize_2d(p: Point, bounds: Bounds, x: Orientation, y: Orientation) -> (f32, f32) {
    (
        normalize_1d(p.x, bounds.x, bounds.width, x),
        normalize_1d(p.y, bounds.y, bounds.height, y),
    )
}

fn orient(t: f32, orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Forward => t,
        Orientation::Inverted => 1.0 - t,
    }
}

/// Map `t` onto `band`. Linear is `min + t·(max - min)`; exponential is
/// `min·(max/min)^t` and falls back to linear for a band that touches zero.
pub fn to_frequency(t: f32, band: Band, curve: Curve) -> f32 {
    let t = clamp_unit(t);
    match curve {
        Curve::Exponential if band.min > 0.0 && band.max > 0.0 => {
            band.min * (band.max / band.min).powf(t)
        }
        _ => band.min + t * (band.max - band.min),
    }
}

/// Inverse of [`to_frequency`], for seeding a normalized position from a
/// frequency.
pub fn frequency_to_t(hz: f32, band: Band, curve: Curve) -> f32 {
    let t = match curve {
        Curve::Exponential if band.min > 0.0 && band.max > 0.0 && hz > 0.0 => {
            (hz / band.min).ln() / (band.max / band.min).ln()
        }
        _ => (hz - band.min) / (band.max - band.min),
    };
    clamp_unit(t)
}

/// Linear gain between `min` and `max`, never outside [0, 1].
pub fn to_gain(t: f32, min: f32, max: f32) -> f32 {
    let gain = min + clamp_unit(t) * (max - min);
    if gain.is_nan() {
        0.0
    } else {
        gain.clamp(0.0, 1.0)
    }
}

/// Relative mapping for controls without a spatial range (knobs).
///
/// Upward travel from `anchor` (the coordinate where the drag began) adds
/// `sensitivity` per unit to `start_value`; the result is clamped to
/// `[min, max]`.
pub fn relative_drag(start_value: f32, anchor: f32, coord: f32, sensitivity: f32, min: f32, max: f32) -> f32 {
    let value = start_value + (anchor - coord) * sensitivity;
    if value.is_nan() {
        return start_value.clamp(min, max);
    }
    value.clamp(min, max)
}

/// Knob sensitivity: a full sweep of the range takes this many units of
/// vertical travel.
pub const KNOB_TRAVEL: f32 = 200.0;

/// Indicator rotation in degrees: -135° at `min`, +135° at `max`.
pub fn knob_angle(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    let t = if span > 0.0 { clamp_unit((value - min) / span) } else { 0.0 };
    t * 270.0 - 135.0
}

fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}
