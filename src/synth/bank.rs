use crate::{
    dsp::{GainRamp, OscillatorBlock, RampCurve, Waveform},
    synth::message::{CommandReceiver, VoiceCommand, VoiceId},
    MAX_BLOCK_SIZE,
};

/// Gesture-driven gain writes are smoothed over this many seconds.
const GAIN_SMOOTHING_SECS: f32 = 0.005;

/// Render-side view of one occupied slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSnapshot {
    pub id: VoiceId,
    pub waveform: Waveform,
    pub frequency: f32,
    pub level: f32,
    pub releasing: bool,
}

struct Slot {
    id: Option<VoiceId>,
    osc: OscillatorBlock,
    frequency: f32,
    gain: GainRamp,
    releasing: bool,
    age: u64,
}

impl Slot {
    fn empty() -> Self {
        Self {
            id: None,
            osc: OscillatorBlock::new(Waveform::Sine),
            frequency: 0.0,
            gain: GainRamp::new(0.0),
            releasing: false,
            age: 0,
        }
    }

    fn snapshot(&self) -> Option<VoiceSnapshot> {
        self.id.map(|id| VoiceSnapshot {
            id,
            waveform: self.osc.waveform(),
            frequency: self.frequency,
            level: self.gain.level(),
            releasing: self.releasing,
        })
    }
}

/// The sounding side of every voice.
///
/// Lives inside the device callback. Slots are allocated up front; commands
/// are applied at the start of each block, so a parameter write lands on the
/// block after it was sent.
pub struct VoiceBank {
    slots: Vec<Slot>,
    scratch: Vec<f32>,
    sample_rate: f32,
    frame_counter: u64,
}

impl VoiceBank {
    pub fn new(sample_rate: f32, capacity: usize) -> Self {
        Self {
            slots: (0..capacity.max(1)).map(|_| Slot::empty()).collect(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            sample_rate,
            frame_counter: 0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Apply every pending command from `rx`.
    pub fn drain<R: CommandReceiver>(&mut self, rx: &mut R) {
        while let Some(cmd) = rx.pop() {
            self.apply(cmd);
        }
    }

    pub fn apply(&mut self, cmd: VoiceCommand) {
        match cmd {
            VoiceCommand::Start {
                id,
                waveform,
                frequency,
                gain,
            } => {
                let slot = self.allocate(id);
                slot.osc.reset(waveform);
                slot.frequency = frequency;
                slot.gain.set(gain);
            }
            VoiceCommand::StartPlucked {
                id,
                waveform,
                frequency,
                pluck,
            } => {
                let attack = self.samples(pluck.attack);
                let decay = self.samples((pluck.decay - pluck.attack).max(0.0));
                let slot = self.allocate(id);
                slot.osc.reset(waveform);
                slot.frequency = frequency;
                slot.gain.set(0.0);
                slot.gain.ramp_to(pluck.peak, attack, RampCurve::Linear);
                slot.gain.then(0.0, decay, RampCurve::Linear);
            }
            VoiceCommand::SetFrequency { id, frequency } => {
                if let Some(slot) = self.find(id) {
                    slot.frequency = frequency;
                }
            }
            VoiceCommand::SetGain { id, gain } => {
                let smoothing = self.samples(GAIN_SMOOTHING_SECS);
                if let Some(slot) = self.find(id) {
                    if !slot.releasing {
                        slot.gain.ramp_to(gain, smoothing, RampCurve::Linear);
                    }
                }
            }
            VoiceCommand::Release { id, fade_secs } => {
                let fade = self.samples(fade_secs);
                if let Some(slot) = self.find(id) {
                    slot.releasing = true;
                    slot.gain.ramp_to(0.0, fade, RampCurve::Exponential);
                }
            }
            VoiceCommand::Stop { id } => {
                if let Some(slot) = self.find(id) {
                    *slot = Slot::empty();
                }
            }
        }
    }

    /// Mix every occupied slot into `out` (mono, overwritten).
    pub fn render_block(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let len = chunk.len();
            for slot in self.slots.iter_mut().filter(|s| s.id.is_some()) {
                let voice = &mut self.scratch[..len];
                slot.osc.render(voice, slot.frequency, self.sample_rate);
                slot.gain.apply(voice);
                for (o, v) in chunk.iter_mut().zip(voice.iter()) {
                    *o += v;
                }
            }
            self.frame_counter += len as u64;
        }
    }

    pub fn live_voices(&self) -> usize {
        self.slots.iter().filter(|s| s.id.is_some()).count()
    }

    pub fn snapshot(&self, id: VoiceId) -> Option<VoiceSnapshot> {
        self.slots
            .iter()
            .find(|s| s.id == Some(id))
            .and_then(Slot::snapshot)
    }

    pub fn voices(&self) -> impl Iterator<Item = VoiceSnapshot> + '_ {
        self.slots.iter().filter_map(Slot::snapshot)
    }

    fn samples(&self, secs: f32) -> u32 {
        (secs * self.sample_rate).round().max(1.0) as u32
    }

    fn find(&mut self, id: VoiceId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == Some(id))
    }

    fn allocate(&mut self, id: VoiceId) -> &mut Slot {
        // Same id again, a free slot, the oldest releasing slot, the oldest slot.
        let idx = self
            .slots
            .iter()
            .position(|s| s.id == Some(id))
            .or_else(|| self.slots.iter().position(|s| s.id.is_none()))
            .or_else(|| {
                self.slots
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.releasing)
                    .min_by_key(|(_, s)| s.age)
                    .map(|(i, _)| i)
            })
            .unwrap_or_else(|| {
                self.slots
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, s)| s.age)
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            });

        let slot = &mut self.slots[idx];
        *slot = Slot::empty();
        slot.id = Some(id);
        slot.age = self.frame_counter;
        slot
    }
}
