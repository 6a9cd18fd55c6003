use std::time::Duration;

use crate::{
    dsp::Waveform,
    engine::DeviceHandle,
    synth::message::{Pluck, VoiceCommand, VoiceId},
};

/// Lowest and highest frequency a voice will accept.
pub const MIN_FREQUENCY: f32 = 1.0;
pub const MAX_FREQUENCY: f32 = 20_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// Being attached to the device.
    Starting,
    /// Sounding under gesture control.
    Sustaining,
    /// Fading out; disposal pending.
    Releasing,
    /// Generator gone. Every mutator is a no-op from here on.
    Disposed,
}

/// Control-side record of one sounding generator.
///
/// A voice has exactly one owner. Dropping a voice that has not been
/// disposed stops its generator, so a voice can never outlive its owner on
/// the device.
pub struct Voice {
    id: VoiceId,
    device: DeviceHandle,
    waveform: Waveform,
    frequency: f32,
    gain: f32,
    state: VoiceState,
}

impl Voice {
    /// Allocate a generator and start it immediately.
    ///
    /// Out-of-range parameters are clamped rather than rejected: gesture
    /// math must never be able to stop a note from playing.
    pub fn start(device: &DeviceHandle, waveform: Waveform, frequency: f32, gain: f32) -> Self {
        let mut voice = Self::starting(device, waveform, frequency, gain);
        voice.device.send(VoiceCommand::Start {
            id: voice.id,
            waveform,
            frequency: voice.frequency,
            gain: voice.gain,
        });
        voice.state = VoiceState::Sustaining;
        voice
    }

    /// Start a voice whose gain follows `pluck` on its own instead of being
    /// held by a gesture.
    pub fn start_plucked(device: &DeviceHandle, waveform: Waveform, frequency: f32, pluck: Pluck) -> Self {
        let pluck = Pluck {
            peak: clamp_gain(pluck.peak),
            attack: pluck.attack.max(0.0),
            decay: pluck.decay.max(pluck.attack.max(0.0)),
        };
        let mut voice = Self::starting(device, waveform, frequency, pluck.peak);
        voice.device.send(VoiceCommand::StartPlucked {
            id: voice.id,
            waveform,
            frequency: voice.frequency,
            pluck,
        });
        voice.state = VoiceState::Sustaining;
        voice
    }

    fn starting(device: &DeviceHandle, waveform: Waveform, frequency: f32, gain: f32) -> Self {
        Self {
            id: device.allocate_voice_id(),
            device: device.clone(),
            waveform,
            frequency: clamp_frequency(frequency),
            gain: clamp_gain(gain),
            state: VoiceState::Starting,
        }
    }

    /// Retune. Allowed while releasing so a fading note can still glide.
    pub fn set_frequency(&mut self, hz: f32) {
        if self.state == VoiceState::Disposed {
            return;
        }
        let hz = clamp_frequency(hz);
        if hz == self.frequency {
            return;
        }
        self.frequency = hz;
        self.device.send(VoiceCommand::SetFrequency {
            id: self.id,
            frequency: hz,
        });
    }

    /// Change loudness. Ignored once releasing, so the fade is not undone.
    pub fn set_gain(&mut self, gain: f32) {
        if self.state != VoiceState::Sustaining {
            return;
        }
        let gain = clamp_gain(gain);
        if gain == self.gain {
            return;
        }
        self.gain = gain;
        self.device.send(VoiceCommand::SetGain { id: self.id, gain });
    }

    /// Begin the exponential fade-out. Returns `false` (and does nothing)
    /// if the voice was already releasing or disposed.
    ///
    /// The owner is responsible for calling [`Voice::dispose_immediately`]
    /// once the fade has run.
    pub fn release(&mut self, fade: Duration) -> bool {
        if self.state != VoiceState::Sustaining {
            return false;
        }
        self.state = VoiceState::Releasing;
        self.device.send(VoiceCommand::Release {
            id: self.id,
            fade_secs: fade.as_secs_f32(),
        });
        true
    }

    /// Hard stop. Safe to call in any state.
    pub fn dispose_immediately(&mut self) {
        if self.state == VoiceState::Disposed {
            return;
        }
        self.state = VoiceState::Disposed;
        self.device.send(VoiceCommand::Stop { id: self.id });
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state != VoiceState::Disposed
    }
}

impl Drop for Voice {
    fn drop(&mut self) {
        self.dispose_immediately();
    }
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("id", &self.id)
            .field("waveform", &self.waveform)
            .field("frequency", &self.frequency)
            .field("gain", &self.gain)
            .field("state", &self.state)
            .finish()
    }
}

fn clamp_frequency(hz: f32) -> f32 {
    if hz.is_nan() {
        return MIN_FREQUENCY;
    }
    hz.clamp(MIN_FREQUENCY, MAX_FREQUENCY)
}

fn clamp_gain(gain: f32) -> f32 {
    if gain.is_nan() {
        return 0.0;
    }
    gain.clamp(0.0, 1.0)
}
