//! The shared output device.
//!
//! One [`AudioEngine`] exists per process. It is created lazily by
//! [`AudioEngine::acquire`] and lives until the process exits; there is no
//! teardown call. Creating the handle does not open a device: that happens on
//! the first [`AudioEngine::ensure_running`], which controllers call from a
//! user gesture, the same way platform autoplay rules only allow sound after
//! one.
//!
//! Everything on this side of the device is single-threaded (`Rc`, `Cell`),
//! which is why the singleton is thread-local to the UI thread. The only
//! thread boundary is inside the backend.

pub mod backend;
pub mod cpal_backend;
pub mod scheduler;

use std::{
    cell::{Cell, OnceCell, RefCell},
    rc::Rc,
};

use crate::{
    error::Result,
    synth::message::{VoiceCommand, VoiceId},
};

use self::{
    backend::{NullBackend, OutputBackend},
    cpal_backend::CpalBackend,
};

pub use scheduler::{Scheduler, TaskHandle};

/// Shared, read-mostly reference to the engine. Cloning is cheap.
pub type DeviceHandle = Rc<AudioEngine>;

/// Builds the backend the first time the engine is started.
pub type BackendOpener = Box<dyn FnOnce(&EngineSettings) -> Result<Box<dyn OutputBackend>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Handle exists, no device opened yet.
    Uninitialized,
    /// Device opened but paused.
    Suspended,
    Running,
}

/// Sizing for the render side.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Slots in the voice bank.
    pub voice_capacity: usize,
    /// Commands the control→audio ring can hold between callbacks.
    pub command_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            voice_capacity: 16,
            command_capacity: 256,
        }
    }
}

thread_local! {
    static ENGINE: OnceCell<DeviceHandle> = const { OnceCell::new() };
}

pub struct AudioEngine {
    state: Cell<EngineState>,
    silent: Cell<bool>,
    backend: RefCell<Option<Box<dyn OutputBackend>>>,
    opener: RefCell<Option<BackendOpener>>,
    settings: EngineSettings,
    next_voice: Cell<u64>,
}

impl AudioEngine {
    /// The process-wide engine, opening the default cpal device when first
    /// started.
    pub fn acquire() -> DeviceHandle {
        Self::acquire_with(EngineSettings::default())
    }

    /// Like [`AudioEngine::acquire`]; `settings` only apply if this call
    /// creates the engine.
    pub fn acquire_with(settings: EngineSettings) -> DeviceHandle {
        ENGINE.with(|cell| {
            cell.get_or_init(|| {
                log::debug!("creating process-wide audio engine");
                Self::new(settings, |settings| {
                    CpalBackend::open(settings).map(|b| Box::new(b) as Box<dyn OutputBackend>)
                })
            })
            .clone()
        })
    }

    /// A standalone engine with its own backend. Used by tests, benches and
    /// hosts that bring their own output.
    pub fn new<F>(settings: EngineSettings, opener: F) -> DeviceHandle
    where
        F: FnOnce(&EngineSettings) -> Result<Box<dyn OutputBackend>> + 'static,
    {
        Rc::new(Self {
            state: Cell::new(EngineState::Uninitialized),
            silent: Cell::new(false),
            backend: RefCell::new(None),
            opener: RefCell::new(Some(Box::new(opener))),
            settings,
            next_voice: Cell::new(1),
        })
    }

    /// Make sure sound can play. Opens the device on first use, resumes it
    /// when suspended, does nothing when already running.
    ///
    /// Never fails: if the device cannot be opened or resumed the engine
    /// switches to a silent backend and keeps going.
    pub fn ensure_running(&self) {
        match self.state.get() {
            EngineState::Running => {}
            EngineState::Uninitialized => {
                let opened = match self.opener.borrow_mut().take() {
                    Some(open) => open(&self.settings),
                    None => Ok(Box::new(NullBackend) as Box<dyn OutputBackend>),
                };
                match opened {
                    Ok(backend) => {
                        log::debug!("audio engine running at {} Hz", backend.sample_rate());
                        self.silent.set(backend.is_silent());
                        *self.backend.borrow_mut() = Some(backend);
                    }
                    Err(err) => {
                        log::warn!("audio disabled: {err}");
                        self.go_silent();
                    }
                }
                self.state.set(EngineState::Running);
            }
            EngineState::Suspended => {
                let resumed = self
                    .backend
                    .borrow_mut()
                    .as_mut()
                    .map_or(Ok(()), |b| b.resume());
                if let Err(err) = resumed {
                    log::warn!("audio resume failed, continuing silently: {err}");
                    self.go_silent();
                }
                log::debug!("audio engine resumed");
                self.state.set(EngineState::Running);
            }
        }
    }

    /// Pause the device. Only meaningful while running.
    pub fn suspend(&self) {
        if self.state.get() != EngineState::Running {
            return;
        }
        let paused = self
            .backend
            .borrow_mut()
            .as_mut()
            .map_or(Ok(()), |b| b.suspend());
        if let Err(err) = paused {
            log::warn!("audio suspend failed: {err}");
        }
        log::debug!("audio engine suspended");
        self.state.set(EngineState::Suspended);
    }

    pub fn state(&self) -> EngineState {
        self.state.get()
    }

    /// True once the engine has fallen back to producing no sound.
    pub fn is_silent(&self) -> bool {
        self.silent.get()
    }

    /// Device sample rate, once a device is open.
    pub fn sample_rate(&self) -> Option<f32> {
        self.backend.borrow().as_ref().map(|b| b.sample_rate())
    }

    pub(crate) fn allocate_voice_id(&self) -> VoiceId {
        let id = self.next_voice.get();
        self.next_voice.set(id + 1);
        VoiceId(id)
    }

    pub(crate) fn send(&self, cmd: VoiceCommand) {
        let mut backend = self.backend.borrow_mut();
        match backend.as_mut() {
            Some(b) => {
                if !b.send(cmd) {
                    log::warn!("command ring full, dropped {cmd:?}");
                }
            }
            None => log::debug!("engine not started, dropped {cmd:?}"),
        }
    }

    fn go_silent(&self) {
        *self.backend.borrow_mut() = Some(Box::new(NullBackend));
        self.silent.set(true);
    }
}
