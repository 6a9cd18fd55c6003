// Purpose: voice ownership on the control side, voice rendering on the audio side

pub mod bank;
pub mod message;
pub mod sequence;
pub mod voice;

pub use message::{Pluck, VoiceCommand, VoiceId};
pub use voice::{Voice, VoiceState};
