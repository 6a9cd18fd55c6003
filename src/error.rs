use std::fmt;

/// Failures that can cross a public API boundary.
///
/// Almost everything in the playground absorbs its own failures: a missing
/// audio device turns into silence, out-of-range gestures are clamped, and
/// writes to a finished voice are ignored. These variants only surface where
/// a caller can actually do something about them (building a backend, parsing
/// a waveform name).
#[derive(Debug, Clone, PartialEq)]
pub enum PlaygroundError {
    /// No output device could be opened.
    DeviceUnavailable(String),
    /// The device refused every stream configuration we asked for.
    StreamConfig(String),
    /// Building, starting or pausing the output stream failed.
    Stream(String),
    /// A waveform name that is not one of sine/sawtooth/square/triangle.
    UnknownWaveform(String),
}

impl fmt::Display for PlaygroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaygroundError::DeviceUnavailable(msg) => write!(f, "audio device unavailable: {msg}"),
            PlaygroundError::StreamConfig(msg) => write!(f, "unsupported stream config: {msg}"),
            PlaygroundError::Stream(msg) => write!(f, "output stream error: {msg}"),
            PlaygroundError::UnknownWaveform(name) => write!(f, "unknown waveform '{name}'"),
        }
    }
}

impl std::error::Error for PlaygroundError {}

pub type Result<T> = std::result::Result<T, PlaygroundError>;
