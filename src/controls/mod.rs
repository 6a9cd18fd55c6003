//! Gesture-driven instruments.
//!
//! Every control on the page follows the same lifecycle:
//!
//! ```text
//!   Idle ──press──▶ Active ──lift──▶ Releasing ──(fade + guard)──▶ Idle
//!                    │  ▲                │
//!                    └──┘ drag           └──press──▶ Active (old voice disposed)
//! ```
//!
//! [`Controller`] owns that lifecycle once, and a [`GestureMapping`] supplies
//! what differs between controls: where a press lands, what pitch and gain a
//! position means, and what to draw. A controller owns at most one voice at
//! a time; starting a new voice always disposes the previous one first, and a
//! pending disposal is cancelled when it is superseded.

pub mod keyboard;
pub mod pad;
pub mod stem;
pub mod synth_panel;

use std::time::Duration;

use crate::{
    config::ReleasePolicy,
    dsp::Waveform,
    engine::{DeviceHandle, Scheduler, TaskHandle},
    gesture::{Normalized, Point},
    synth::{Voice, VoiceId},
};

pub use keyboard::KeyboardMapping;
pub use pad::PadMapping;
pub use stem::StemMapping;
pub use synth_panel::SynthPanel;

/// Which control a deferred task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Keyboard,
    Stem,
    Pad,
    Synth,
}

/// Pitch and level a mapping wants to sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub gain: f32,
    /// Discrete note index, for controls that have them.
    pub note: Option<usize>,
}

impl Tone {
    pub fn new(frequency: f32, gain: f32) -> Self {
        Self {
            frequency,
            gain,
            note: None,
        }
    }

    pub fn note(mut self, index: usize) -> Self {
        self.note = Some(index);
        self
    }
}

/// What a press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Press {
    /// Start a voice held for the duration of the gesture.
    Sound(Tone),
    /// Adjust the sounding voice, if any, without starting one.
    Adjust(Tone),
    /// Start or stop a latched voice.
    Toggle,
    /// The mapping changed waveform; restart a sounding voice with it.
    Restart,
    /// Nothing under the pointer.
    Miss,
}

/// How a held voice follows a drag that lands on a different note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retrigger {
    /// Retune the sounding voice.
    Glide,
    /// Dispose the voice and start a fresh one on the new note.
    Discrete,
}

/// The control-specific half of a [`Controller`].
pub trait GestureMapping {
    /// Visual state handed to the UI.
    type Feedback: Clone + std::fmt::Debug + PartialEq;

    fn waveform(&self) -> Waveform;

    fn press(&mut self, at: Point) -> Press;

    /// `None` leaves the voice alone.
    fn drag(&mut self, at: Point) -> Option<Tone>;

    fn lift(&mut self) {}

    /// Pointer moving without a press. `Some(gain)` sets the gain of a
    /// sounding voice.
    fn hover(&mut self, _at: Option<Point>) -> Option<f32> {
        None
    }

    /// Tone to start when toggled on or restarted.
    fn tone(&self) -> Option<Tone> {
        None
    }

    fn retrigger(&self) -> Retrigger {
        Retrigger::Glide
    }

    /// Whether leaving the control ends a held gesture.
    fn ends_on_leave(&self) -> bool {
        true
    }

    /// Last mapped position, normalized.
    fn position(&self) -> Normalized;

    fn feedback(&self, sounding: bool) -> Self::Feedback;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Releasing,
}

/// A scheduled disposal. Carries the voice it was scheduled for so that a
/// stale task can be recognised and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseTask {
    pub control: ControlId,
    pub voice: VoiceId,
}

pub struct Controller<M> {
    id: ControlId,
    mapping: M,
    device: DeviceHandle,
    release: ReleasePolicy,
    voice: Option<Voice>,
    pending_release: Option<TaskHandle>,
    phase: Phase,
    holding: bool,
    note: Option<usize>,
}

impl<M: GestureMapping> Controller<M> {
    pub fn new(id: ControlId, mapping: M, device: DeviceHandle, release: ReleasePolicy) -> Self {
        Self {
            id,
            mapping,
            device,
            release,
            voice: None,
            pending_release: None,
            phase: Phase::Idle,
            holding: false,
            note: None,
        }
    }

    pub fn press<T: From<ReleaseTask>>(&mut self, at: Point, now: Duration, scheduler: &mut Scheduler<T>) {
        match self.mapping.press(at) {
            Press::Sound(tone) => {
                self.start(tone, scheduler);
                self.holding = true;
            }
            Press::Adjust(tone) => self.retune(tone),
            Press::Toggle => self.toggle(now, scheduler),
            Press::Restart => self.restart(scheduler),
            Press::Miss => {}
        }
    }

    pub fn drag<T: From<ReleaseTask>>(&mut self, at: Point, scheduler: &mut Scheduler<T>) {
        let Some(tone) = self.mapping.drag(at) else {
            return;
        };
        if self.holding && self.mapping.retrigger() == Retrigger::Discrete && tone.note != self.note {
            self.start(tone, scheduler);
            return;
        }
        self.retune(tone);
    }

    /// End of a gesture: pointer up, cancel, or leaving the control.
    pub fn lift<T: From<ReleaseTask>>(&mut self, now: Duration, scheduler: &mut Scheduler<T>) {
        self.mapping.lift();
        if std::mem::take(&mut self.holding) {
            self.release(now, scheduler);
        }
    }

    pub fn hover(&mut self, at: Option<Point>) {
        if let Some(gain) = self.mapping.hover(at) {
            if let Some(voice) = self.voice.as_mut() {
                voice.set_gain(gain);
            }
        }
    }

    /// Start a latched voice, or release the one that is sounding.
    pub fn toggle<T: From<ReleaseTask>>(&mut self, now: Duration, scheduler: &mut Scheduler<T>) {
        if self.phase == Phase::Active {
            self.release(now, scheduler);
        } else if let Some(tone) = self.mapping.tone() {
            self.start(tone, scheduler);
        }
    }

    /// Replace a sounding voice with one built from the mapping's current
    /// waveform and tone.
    pub fn restart<T: From<ReleaseTask>>(&mut self, scheduler: &mut Scheduler<T>) {
        if self.phase != Phase::Active {
            return;
        }
        if let Some(tone) = self.mapping.tone() {
            self.start(tone, scheduler);
        }
    }

    /// A scheduled disposal came due.
    pub fn on_release_due(&mut self, voice: VoiceId) {
        let current = self.voice.as_ref().map(Voice::id);
        if self.phase != Phase::Releasing || current != Some(voice) {
            log::trace!("{:?}: stale release for {voice:?} ignored", self.id);
            return;
        }
        if let Some(mut voice) = self.voice.take() {
            voice.dispose_immediately();
        }
        self.pending_release = None;
        self.phase = Phase::Idle;
        self.note = None;
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn voice(&self) -> Option<&Voice> {
        self.voice.as_ref()
    }

    pub fn has_pending_release(&self) -> bool {
        self.pending_release.is_some()
    }

    pub fn ends_on_leave(&self) -> bool {
        self.mapping.ends_on_leave()
    }

    /// Whether a gesture is currently holding a voice.
    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn position(&self) -> Normalized {
        self.mapping.position()
    }

    pub fn feedback(&self) -> M::Feedback {
        self.mapping.feedback(self.phase == Phase::Active)
    }

    pub fn mapping(&self) -> &M {
        &self.mapping
    }

    pub fn mapping_mut(&mut self) -> &mut M {
        &mut self.mapping
    }

    fn start<T: From<ReleaseTask>>(&mut self, tone: Tone, scheduler: &mut Scheduler<T>) {
        self.supersede(scheduler);
        self.device.ensure_running();
        let voice = Voice::start(&self.device, self.mapping.waveform(), tone.frequency, tone.gain);
        log::trace!("{:?}: {:?} at {:.1} Hz", self.id, voice.id(), voice.frequency());
        self.voice = Some(voice);
        self.note = tone.note;
        self.phase = Phase::Active;
    }

    fn retune(&mut self, tone: Tone) {
        if let Some(voice) = self.voice.as_mut() {
            voice.set_frequency(tone.frequency);
            voice.set_gain(tone.gain);
        }
    }

    fn release<T: From<ReleaseTask>>(&mut self, now: Duration, scheduler: &mut Scheduler<T>) {
        let Some(voice) = self.voice.as_mut() else {
            return;
        };
        if !voice.release(self.release.fade) {
            return;
        }
        let task = ReleaseTask {
            control: self.id,
            voice: voice.id(),
        };
        self.pending_release = Some(scheduler.schedule(now + self.release.disposal_delay(), task.into()));
        self.phase = Phase::Releasing;
    }

    fn supersede<T>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(handle) = self.pending_release.take() {
            scheduler.cancel(handle);
        }
        if let Some(mut voice) = self.voice.take() {
            voice.dispose_immediately();
        }
    }
}


#[cfg(test)]
mod tests {
    use super::{test_support::offline_engine, *};
    use crate::{
        engine::backend::OfflineTap,
        gesture::{Bounds, Curve},
        synth::VoiceState,
    };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn stem() -> (Controller<StemMapping>, OfflineTap) {
        let (engine, tap) = offline_engine();
        let mut mapping = StemMapping::new(Default::default());
        mapping.set_bounds(Bounds::new(0.0, 0.0, 20.0, 100.0), Bounds::new(0.0, 100.0, 20.0, 20.0));
        (Controller::new(ControlId::Stem, mapping, engine, ReleasePolicy::default()), tap)
    }

    fn drain(c: &mut Controller<impl GestureMapping>, s: &mut Scheduler<ReleaseTask>, now: Duration) {
        while let Some(task) = s.pop_due(now) {
            c.on_release_due(task.voice);
        }
    }

    #[test]
    fn press_starts_then_lift_releases_then_disposes() {
        let (mut c, tap) = stem();
        let mut s = Scheduler::new();

        c.press(Point::new(10.0, 50.0), ms(0), &mut s);
        assert_eq!(c.phase(), Phase::Active);
        assert!(c.is_holding());
        assert!(!c.has_pending_release());
        assert_eq!(tap.live_voices(), 1);

        c.lift(ms(500), &mut s);
        assert_eq!(c.phase(), Phase::Releasing);
        assert!(!c.is_holding());
        assert!(c.has_pending_release());
        assert_eq!(s.next_due(), Some(ms(620)));

        drain(&mut c, &mut s, ms(619));
        assert_eq!(tap.live_voices(), 1);
        drain(&mut c, &mut s, ms(620));
        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.has_pending_release());
        assert!(c.voice().is_none());
        assert_eq!(tap.live_voices(), 0);
    }

    #[test]
    fn press_during_release_supersedes_the_fading_voice() {
        let (mut c, tap) = stem();
        let mut s = Scheduler::new();

        c.press(Point::new(10.0, 50.0), ms(0), &mut s);
        c.lift(ms(100), &mut s);
        let fading = c.voice().map(Voice::id);

        c.press(Point::new(10.0, 20.0), ms(150), &mut s);
        assert_eq!(tap.live_voices(), 1);
        assert_ne!(c.voice().map(Voice::id), fading);
        assert!(s.is_empty(), "pending disposal was cancelled");
        assert!(!c.has_pending_release());
        assert!(c.is_holding());

        drain(&mut c, &mut s, ms(1_000));
        assert_eq!(c.phase(), Phase::Active);
        assert_eq!(tap.live_voices(), 1);
    }

    #[test]
    fn stale_release_is_ignored() {
        let (mut c, _tap) = stem();
        let mut s: Scheduler<ReleaseTask> = Scheduler::new();
        c.press(Point::new(10.0, 50.0), ms(0), &mut s);
        c.on_release_due(VoiceId(9_999));
        assert_eq!(c.phase(), Phase::Active);
        assert_eq!(c.voice().map(Voice::state), Some(VoiceState::Sustaining));
    }

    #[test]
    fn lift_without_press_does_nothing() {
        let (mut c, tap) = stem();
        let mut s: Scheduler<ReleaseTask> = Scheduler::new();
        c.lift(ms(0), &mut s);
        c.lift(ms(0), &mut s);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(s.is_empty());
        assert!(tap.commands().is_empty());
    }

    #[test]
    fn double_lift_schedules_one_disposal() {
        let (mut c, _tap) = stem();
        let mut s: Scheduler<ReleaseTask> = Scheduler::new();
        c.press(Point::new(10.0, 50.0), ms(0), &mut s);
        c.lift(ms(10), &mut s);
        c.lift(ms(11), &mut s);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn latched_toggle_starts_and_releases() {
        let (engine, tap) = offline_engine();
        let mut panel = SynthPanel::new(Default::default());
        panel.set_bounds(Bounds::new(0.0, 0.0, 40.0, 40.0), Bounds::new(50.0, 0.0, 40.0, 40.0));
        let mut c = Controller::new(ControlId::Synth, panel, engine, ReleasePolicy::default());
        let mut s = Scheduler::new();

        c.toggle(ms(0), &mut s);
        assert_eq!(c.phase(), Phase::Active);
        assert!(!c.is_holding(), "latched, not held");
        assert_eq!(c.voice().map(Voice::waveform), Some(Waveform::Sawtooth));

        // grabbing a knob does not end the note on lift
        c.press(Point::new(20.0, 20.0), ms(10), &mut s);
        c.drag(Point::new(20.0, 10.0), &mut s);
        c.lift(ms(20), &mut s);
        assert_eq!(c.phase(), Phase::Active);
        assert_eq!(c.voice().map(Voice::frequency), Some(260.0));

        c.toggle(ms(30), &mut s);
        assert_eq!(c.phase(), Phase::Releasing);
        drain(&mut c, &mut s, ms(150));
        assert_eq!(tap.live_voices(), 0);
    }

    #[test]
    fn pad_glides_without_retriggering() {
        let (engine, tap) = offline_engine();
        let mut pad = PadMapping::new(Default::default());
        pad.set_bounds(Bounds::new(0.0, 0.0, 300.0, 100.0));
        let mut c = Controller::new(ControlId::Pad, pad, engine, ReleasePolicy::default());
        let mut s: Scheduler<ReleaseTask> = Scheduler::new();

        c.press(Point::new(0.0, 50.0), ms(0), &mut s);
        let id = c.voice().map(Voice::id);
        c.drag(Point::new(100.0, 0.0), &mut s);
        assert_eq!(c.voice().map(Voice::id), id);
        let f = c.voice().map(Voice::frequency).unwrap_or_default();
        let expected = crate::gesture::to_frequency(1.0 / 3.0, c.mapping().band(), Curve::Exponential);
        assert!((f - expected).abs() < 1e-3);
        assert_eq!(tap.live_voices(), 1);
    }
}
