//! Low-level DSP primitives used by the voice bank.
//!
//! These components are allocation-free and realtime-safe, so the bank can
//! hold them inline and run them inside the device callback.

/// Gain ramps (linear smoothing, exponential release).
pub mod ramp;
/// Oscillator waveforms.
pub mod oscillator;

pub use oscillator::{OscillatorBlock, Waveform};
pub use ramp::{GainRamp, RampCurve, RAMP_FLOOR};
