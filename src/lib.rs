pub mod config; // Tunable policy and defaults
pub mod controls; // Gesture-driven instruments
pub mod dsp;
pub mod engine; // Shared output device, backends and deferred tasks
pub mod error;
pub mod gesture; // Pointer geometry to audio parameters
pub mod playground;
pub mod render; // Ambient waveform background
pub mod synth; // Voice ownership and rendering

pub use config::PlaygroundConfig;
pub use error::{PlaygroundError, Result};
pub use playground::{GestureEvent, Layout, Playground};

pub const MAX_BLOCK_SIZE: usize = 2048;
