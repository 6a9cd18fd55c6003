//! Real-world scenario benchmarks.
//!
//! These model what the playground actually does: several gesture voices
//! mixed in one device callback, and one background frame per UI tick.

mod bank;
mod waveform;

pub use bank::bench_bank;
pub use waveform::bench_waveform;
