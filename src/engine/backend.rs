use std::{cell::RefCell, rc::Rc};

use crate::{
    error::Result,
    synth::{
        bank::{VoiceBank, VoiceSnapshot},
        message::{VoiceCommand, VoiceId},
    },
};

/// Where voice commands end up.
///
/// The engine only ever talks to a device through this trait, so tests and
/// benches can swap the real output for an in-process bank.
pub trait OutputBackend {
    fn sample_rate(&self) -> f32;

    /// Hand a command to the device. Must not block. Returns `false` if the
    /// command had to be dropped.
    fn send(&mut self, cmd: VoiceCommand) -> bool;

    fn resume(&mut self) -> Result<()>;

    fn suspend(&mut self) -> Result<()>;

    /// True for backends that produce no sound at all.
    fn is_silent(&self) -> bool {
        false
    }
}

/// Accepts and discards everything. Installed when no device can be opened.
#[derive(Debug, Default)]
pub struct NullBackend;

impl OutputBackend for NullBackend {
    fn sample_rate(&self) -> f32 {
        48_000.0
    }

    fn send(&mut self, _cmd: VoiceCommand) -> bool {
        true
    }

    fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    fn suspend(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_silent(&self) -> bool {
        true
    }
}

struct OfflineState {
    bank: VoiceBank,
    suspended: bool,
    commands: Vec<VoiceCommand>,
}

/// Backend that applies commands to an in-process [`VoiceBank`] straight
/// away. Audio is only produced when the paired [`OfflineTap`] renders.
pub struct OfflineBackend {
    state: Rc<RefCell<OfflineState>>,
}

/// Inspection and rendering side of an [`OfflineBackend`].
#[derive(Clone)]
pub struct OfflineTap {
    state: Rc<RefCell<OfflineState>>,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32, capacity: usize) -> (Self, OfflineTap) {
        let state = Rc::new(RefCell::new(OfflineState {
            bank: VoiceBank::new(sample_rate, capacity),
            suspended: false,
            commands: Vec::new(),
        }));
        (
            Self {
                state: state.clone(),
            },
            OfflineTap { state },
        )
    }
}

impl OutputBackend for OfflineBackend {
    fn sample_rate(&self) -> f32 {
        self.state.borrow().bank.sample_rate()
    }

    fn send(&mut self, cmd: VoiceCommand) -> bool {
        let mut state = self.state.borrow_mut();
        state.commands.push(cmd);
        state.bank.apply(cmd);
        true
    }

    fn resume(&mut self) -> Result<()> {
        self.state.borrow_mut().suspended = false;
        Ok(())
    }

    fn suspend(&mut self) -> Result<()> {
        self.state.borrow_mut().suspended = true;
        Ok(())
    }
}

impl OfflineTap {
    /// Render `frames` mono samples. A suspended device renders silence
    /// and does not advance its voices.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        let mut state = self.state.borrow_mut();
        if !state.suspended {
            state.bank.render_block(&mut out);
        }
        out
    }

    pub fn live_voices(&self) -> usize {
        self.state.borrow().bank.live_voices()
    }

    pub fn snapshot(&self, id: VoiceId) -> Option<VoiceSnapshot> {
        self.state.borrow().bank.snapshot(id)
    }

    pub fn voices(&self) -> Vec<VoiceSnapshot> {
        self.state.borrow().bank.voices().collect()
    }

    /// Every command received so far, oldest first.
    pub fn commands(&self) -> Vec<VoiceCommand> {
        self.state.borrow().commands.clone()
    }

    pub fn is_suspended(&self) -> bool {
        self.state.borrow().suspended
    }
}
