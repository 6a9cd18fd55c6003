//! Fire-and-forget note batches.
//!
//! A sequence is a list of pitches played one after another, each with its
//! own pluck envelope and a fixed hold after which the voice is disposed.
//! Nothing about it is gesture-held, so there is no release phase: the pluck
//! has already decayed to silence by the time the hold runs out.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::Waveform,
    engine::{DeviceHandle, Scheduler},
    synth::{
        message::{Pluck, VoiceId},
        voice::Voice,
    },
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct NoteSequence {
    /// Pitches in play order, Hz.
    pub notes: Vec<f32>,
    /// Onset distance between consecutive notes.
    pub spacing: Duration,
    /// How long each voice lives after its onset.
    pub hold: Duration,
    pub pluck: Pluck,
    pub waveform: Waveform,
}

impl Default for NoteSequence {
    /// Rising C major arpeggio, C4 to G5.
    fn default() -> Self {
        Self {
            notes: vec![261.63, 329.63, 392.00, 523.25, 659.25, 783.99],
            spacing: Duration::from_millis(80),
            hold: Duration::from_millis(400),
            pluck: Pluck {
                peak: 0.15,
                attack: 0.02,
                decay: 0.3,
            },
            waveform: Waveform::Sine,
        }
    }
}

/// Deferred work for a [`SequencePlayer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequenceTask {
    NoteOn { frequency: f32 },
    NoteOff { voice: VoiceId },
}

pub struct SequencePlayer {
    device: DeviceHandle,
    sequence: NoteSequence,
    voices: Vec<Voice>,
}

impl SequencePlayer {
    pub fn new(device: DeviceHandle, sequence: NoteSequence) -> Self {
        Self {
            device,
            sequence,
            voices: Vec::new(),
        }
    }

    /// Schedule every note of the sequence starting at `now`. Overlapping
    /// triggers are allowed; each note owns its own voice.
    pub fn trigger<T: From<SequenceTask>>(&mut self, now: Duration, scheduler: &mut Scheduler<T>) {
        self.device.ensure_running();
        log::debug!("sequence of {} notes triggered", self.sequence.notes.len());
        let mut onset = now;
        for &frequency in &self.sequence.notes {
            scheduler.schedule(onset, SequenceTask::NoteOn { frequency }.into());
            onset += self.sequence.spacing;
        }
    }

    /// Run a task that came due.
    pub fn handle<T: From<SequenceTask>>(&mut self, task: SequenceTask, now: Duration, scheduler: &mut Scheduler<T>) {
        match task {
            SequenceTask::NoteOn { frequency } => {
                let voice = Voice::start_plucked(&self.device, self.sequence.waveform, frequency, self.sequence.pluck);
                scheduler.schedule(now + self.sequence.hold, SequenceTask::NoteOff { voice: voice.id() }.into());
                self.voices.push(voice);
            }
            SequenceTask::NoteOff { voice } => {
                if let Some(pos) = self.voices.iter().position(|v| v.id() == voice) {
                    let mut voice = self.voices.swap_remove(pos);
                    voice.dispose_immediately();
                }
            }
        }
    }

    /// Voices started and not yet disposed.
    pub fn sounding(&self) -> usize {
        self.voices.len()
    }

    pub fn sequence(&self) -> &NoteSequence {
        &self.sequence
    }
}
