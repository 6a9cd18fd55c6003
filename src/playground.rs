//! The page: every control, the sequence player and the background, behind
//! one event entry point and one tick.
//!
//! Hosts translate their input into [`GestureEvent`]s, call
//! [`Playground::handle`] as events arrive and [`Playground::tick`] once per
//! frame. Both take the host's clock explicitly.

use std::time::Duration;

use crate::{
    config::PlaygroundConfig,
    controls::{
        ControlId, Controller, GestureMapping, KeyboardMapping, PadMapping, ReleaseTask, StemMapping, SynthPanel,
    },
    dsp::Waveform,
    engine::{AudioEngine, DeviceHandle, Scheduler},
    gesture::{Bounds, Point},
    render::{DrawSurface, WaveformRenderer},
    synth::{
        sequence::{SequencePlayer, SequenceTask},
        VoiceId,
    },
};

/// Pointer input in surface units. Touch maps onto Down/Move/Up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Down(Point),
    /// Pointer moved; a drag while captured, a hover otherwise.
    Move(Point),
    Up(Point),
    /// Pointer left the surface or the gesture was cancelled.
    Leave,
    Hover(Point),
    HoverExit,
}

/// Where everything sits on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub keyboard: Bounds,
    pub stem: Bounds,
    pub mouth: Bounds,
    pub pad: Bounds,
    /// Whole synth panel; presses inside it go to the panel.
    pub synth: Bounds,
    pub frequency_knob: Bounds,
    pub volume_knob: Bounds,
    pub play_button: Bounds,
    pub waveform_buttons: [Bounds; 4],
    /// Visible waveform background. A press here that misses every control
    /// freezes the animation.
    pub waveform: Bounds,
}

/// Deferred work, run from [`Playground::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Task {
    Release(ReleaseTask),
    Sequence(SequenceTask),
}

impl From<ReleaseTask> for Task {
    fn from(task: ReleaseTask) -> Self {
        Task::Release(task)
    }
}

impl From<SequenceTask> for Task {
    fn from(task: SequenceTask) -> Self {
        Task::Sequence(task)
    }
}

/// Object-safe face of a [`Controller`], for routing by id.
trait Control {
    fn press(&mut self, at: Point, now: Duration, scheduler: &mut Scheduler<Task>);
    fn drag(&mut self, at: Point, scheduler: &mut Scheduler<Task>);
    fn lift(&mut self, now: Duration, scheduler: &mut Scheduler<Task>);
    fn hover(&mut self, at: Option<Point>);
    fn on_release_due(&mut self, voice: VoiceId);
    fn ends_on_leave(&self) -> bool;
}

impl<M: GestureMapping> Control for Controller<M> {
    fn press(&mut self, at: Point, now: Duration, scheduler: &mut Scheduler<Task>) {
        Controller::press(self, at, now, scheduler)
    }

    fn drag(&mut self, at: Point, scheduler: &mut Scheduler<Task>) {
        Controller::drag(self, at, scheduler)
    }

    fn lift(&mut self, now: Duration, scheduler: &mut Scheduler<Task>) {
        Controller::lift(self, now, scheduler)
    }

    fn hover(&mut self, at: Option<Point>) {
        Controller::hover(self, at)
    }

    fn on_release_due(&mut self, voice: VoiceId) {
        Controller::on_release_due(self, voice)
    }

    fn ends_on_leave(&self) -> bool {
        Controller::ends_on_leave(self)
    }
}

const CONTROLS: [ControlId; 4] = [ControlId::Synth, ControlId::Keyboard, ControlId::Stem, ControlId::Pad];

pub struct Playground {
    engine: DeviceHandle,
    keyboard: Controller<KeyboardMapping>,
    stem: Controller<StemMapping>,
    pad: Controller<PadMapping>,
    synth: Controller<SynthPanel>,
    sequence: SequencePlayer,
    renderer: WaveformRenderer,
    scheduler: Scheduler<Task>,
    layout: Layout,
    capture: Option<ControlId>,
}

impl Playground {
    /// Playground on the process-wide engine.
    pub fn new(config: PlaygroundConfig) -> Self {
        let engine = AudioEngine::acquire_with(config.engine);
        Self::with_engine(config, engine)
    }

    pub fn with_engine(config: PlaygroundConfig, engine: DeviceHandle) -> Self {
        let tuning = config.controls;
        let release = config.release;
        Self {
            keyboard: Controller::new(ControlId::Keyboard, KeyboardMapping::new(tuning), engine.clone(), release),
            stem: Controller::new(ControlId::Stem, StemMapping::new(tuning), engine.clone(), release),
            pad: Controller::new(ControlId::Pad, PadMapping::new(tuning), engine.clone(), release),
            synth: Controller::new(ControlId::Synth, SynthPanel::new(tuning), engine.clone(), release),
            sequence: SequencePlayer::new(engine.clone(), config.sequence),
            renderer: WaveformRenderer::new(&config.renderer, config.freeze),
            scheduler: Scheduler::new(),
            layout: Layout::default(),
            capture: None,
            engine,
        }
    }

    /// Place the controls and size the background.
    pub fn layout(&mut self, layout: Layout) {
        self.keyboard.mapping_mut().set_bounds(layout.keyboard);
        self.stem.mapping_mut().set_bounds(layout.stem, layout.mouth);
        self.pad.mapping_mut().set_bounds(layout.pad);
        let panel = self.synth.mapping_mut();
        panel.set_bounds(layout.frequency_knob, layout.volume_knob);
        panel.set_buttons(layout.play_button, layout.waveform_buttons);
        self.renderer.resize(layout.width, layout.height, layout.scale);
        self.layout = layout;
    }

    pub fn handle(&mut self, event: GestureEvent, now: Duration) {
        match event {
            GestureEvent::Down(at) => {
                if let Some(id) = self.capture.take() {
                    self.with_control(id, |c, s| c.lift(now, s));
                }
                match self.hit(at) {
                    Some(id) => {
                        self.capture = Some(id);
                        self.with_control(id, |c, s| c.press(at, now, s));
                    }
                    None if self.layout.waveform.contains(at) => self.freeze(now),
                    None => {}
                }
            }
            GestureEvent::Move(at) => match self.capture {
                Some(id) => {
                    let leaving = !self.region(id).contains(at);
                    if leaving && self.with_control(id, |c, _| c.ends_on_leave()) {
                        self.capture = None;
                        self.with_control(id, |c, s| c.lift(now, s));
                    } else {
                        self.with_control(id, |c, s| c.drag(at, s));
                    }
                }
                None => self.hover_all(Some(at)),
            },
            GestureEvent::Up(_) | GestureEvent::Leave => {
                if let Some(id) = self.capture.take() {
                    self.with_control(id, |c, s| c.lift(now, s));
                }
                if event == GestureEvent::Leave {
                    self.hover_all(None);
                }
            }
            GestureEvent::Hover(at) => self.hover_all(Some(at)),
            GestureEvent::HoverExit => self.hover_all(None),
        }
    }

    /// Run due tasks in due order, then advance and draw the background.
    pub fn tick(&mut self, now: Duration, surface: &mut impl DrawSurface) {
        while let Some(task) = self.scheduler.pop_due(now) {
            match task {
                Task::Release(release) => {
                    self.with_control(release.control, |c, _| c.on_release_due(release.voice))
                }
                Task::Sequence(step) => self.sequence.handle(step, now, &mut self.scheduler),
            }
        }
        self.renderer.tick(now, surface);
    }

    /// Same as a press on the background.
    pub fn freeze(&mut self, now: Duration) {
        self.renderer.trigger_freeze(now);
    }

    pub fn trigger_sequence(&mut self, now: Duration) {
        self.sequence.trigger(now, &mut self.scheduler);
    }

    /// Start or stop the synth panel's latched note.
    pub fn toggle_synth(&mut self, now: Duration) {
        self.synth.toggle(now, &mut self.scheduler);
    }

    pub fn select_waveform(&mut self, waveform: Waveform) {
        if self.synth.mapping_mut().select_waveform(waveform) {
            self.synth.restart(&mut self.scheduler);
        }
    }

    /// Host lost focus: end any gesture and pause the device.
    pub fn suspend(&mut self, now: Duration) {
        if let Some(id) = self.capture.take() {
            self.with_control(id, |c, s| c.lift(now, s));
        }
        self.engine.suspend();
    }

    pub fn engine(&self) -> &DeviceHandle {
        &self.engine
    }

    pub fn keyboard(&self) -> &Controller<KeyboardMapping> {
        &self.keyboard
    }

    pub fn stem(&self) -> &Controller<StemMapping> {
        &self.stem
    }

    pub fn pad(&self) -> &Controller<PadMapping> {
        &self.pad
    }

    pub fn synth(&self) -> &Controller<SynthPanel> {
        &self.synth
    }

    pub fn sequence(&self) -> &SequencePlayer {
        &self.sequence
    }

    pub fn renderer(&self) -> &WaveformRenderer {
        &self.renderer
    }

    pub fn current_layout(&self) -> &Layout {
        &self.layout
    }

    /// Control holding the pointer, if any.
    pub fn captured(&self) -> Option<ControlId> {
        self.capture
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    fn hit(&self, at: Point) -> Option<ControlId> {
        CONTROLS.into_iter().find(|&id| self.region(id).contains(at))
    }

    fn region(&self, id: ControlId) -> Bounds {
        match id {
            ControlId::Keyboard => self.layout.keyboard,
            ControlId::Stem => self.layout.stem,
            ControlId::Pad => self.layout.pad,
            ControlId::Synth => self.layout.synth,
        }
    }

    fn hover_all(&mut self, at: Option<Point>) {
        for id in CONTROLS {
            self.with_control(id, |c, _| c.hover(at));
        }
    }

    fn with_control<R>(&mut self, id: ControlId, f: impl FnOnce(&mut dyn Control, &mut Scheduler<Task>) -> R) -> R {
        let Self {
            keyboard,
            stem,
            pad,
            synth,
            scheduler,
            ..
        } = self;
        let control: &mut dyn Control = match id {
            ControlId::Keyboard => keyboard,
            ControlId::Stem => stem,
            ControlId::Pad => pad,
            ControlId::Synth => synth,
        };
        f(control, scheduler)
    }
}
