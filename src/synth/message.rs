use rtrb::Consumer;

use crate::dsp::Waveform;

/// Identity of one voice on the device. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

/// Attack/decay shape for notes that play without a held gesture.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pluck {
    /// Peak gain reached at the end of the attack.
    pub peak: f32,
    /// Seconds from silence to `peak`.
    pub attack: f32,
    /// Seconds from note start until the level is back at zero.
    pub decay: f32,
}

/// Control-thread to audio-thread messages. `Copy` so they move through the
/// ring without allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceCommand {
    Start {
        id: VoiceId,
        waveform: Waveform,
        frequency: f32,
        gain: f32,
    },
    StartPlucked {
        id: VoiceId,
        waveform: Waveform,
        frequency: f32,
        pluck: Pluck,
    },
    SetFrequency {
        id: VoiceId,
        frequency: f32,
    },
    SetGain {
        id: VoiceId,
        gain: f32,
    },
    /// Exponential fade toward the floor. The slot keeps sounding at the
    /// floor until `Stop` arrives.
    Release {
        id: VoiceId,
        fade_secs: f32,
    },
    Stop {
        id: VoiceId,
    },
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<VoiceCommand>;
}

impl CommandReceiver for Consumer<VoiceCommand> {
    fn pop(&mut self) -> Option<VoiceCommand> {
        Consumer::pop(self).ok()
    }
}
