use std::time::Duration;

use gesture_synth::{
    controls::{ControlId, Phase},
    dsp::RAMP_FLOOR,
    engine::{
        backend::{OfflineBackend, OfflineTap, OutputBackend},
        AudioEngine, EngineSettings, EngineState,
    },
    gesture::{Bounds, Point},
    render::FrameRecorder,
    synth::VoiceState,
    GestureEvent, Layout, Playground, PlaygroundConfig, PlaygroundError,
};

const SAMPLE_RATE: f32 = 1_000.0;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn layout() -> Layout {
    Layout {
        width: 600.0,
        height: 200.0,
        scale: 2.0,
        keyboard: Bounds::new(0.0, 0.0, 160.0, 80.0),
        stem: Bounds::new(200.0, 100.0, 20.0, 100.0),
        mouth: Bounds::new(190.0, 60.0, 40.0, 40.0),
        pad: Bounds::new(300.0, 0.0, 100.0, 100.0),
        synth: Bounds::new(450.0, 0.0, 150.0, 100.0),
        frequency_knob: Bounds::new(460.0, 40.0, 40.0, 40.0),
        volume_knob: Bounds::new(520.0, 40.0, 40.0, 40.0),
        play_button: Bounds::new(460.0, 0.0, 100.0, 15.0),
        waveform_buttons: [
            Bounds::new(460.0, 20.0, 20.0, 15.0),
            Bounds::new(480.0, 20.0, 20.0, 15.0),
            Bounds::new(500.0, 20.0, 20.0, 15.0),
            Bounds::new(520.0, 20.0, 20.0, 15.0),
        ],
        waveform: Bounds::new(0.0, 0.0, 600.0, 200.0),
    }
}

fn offline_playground() -> (Playground, OfflineTap) {
    let (backend, tap) = OfflineBackend::new(SAMPLE_RATE, 16);
    let engine = AudioEngine::new(EngineSettings::default(), move |_| {
        Ok(Box::new(backend) as Box<dyn OutputBackend>)
    });
    let mut playground = Playground::with_engine(PlaygroundConfig::default(), engine);
    playground.layout(layout());
    (playground, tap)
}

#[test]
fn stem_sweep_rises_from_200_to_800_hz() {
    let (mut p, tap) = offline_playground();
    p.handle(GestureEvent::Down(Point::new(210.0, 199.9)), ms(0));

    let mut heard = Vec::new();
    for step in 0..=100 {
        let y = 200.0 - step as f32;
        p.handle(GestureEvent::Move(Point::new(210.0, y.min(199.9))), ms(step));
        tap.render(16);
        let voice = tap.voices();
        assert_eq!(voice.len(), 1);
        heard.push(voice[0].frequency);
    }

    assert!((heard[0] - 200.0).abs() < 6.1, "bottom of the stem, got {}", heard[0]);
    assert_eq!(heard[100], 800.0);
    assert!(heard.windows(2).all(|w| w[0] <= w[1]), "{heard:?}");
}

#[test]
fn retrigger_over_a_release_leaves_one_voice() {
    let (mut p, tap) = offline_playground();
    let mut surface = FrameRecorder::new();

    p.handle(GestureEvent::Down(Point::new(350.0, 50.0)), ms(0));
    p.handle(GestureEvent::Up(Point::new(350.0, 50.0)), ms(200));
    assert_eq!(p.pad().phase(), Phase::Releasing);
    let fading = p.pad().voice().map(|v| v.id());

    p.handle(GestureEvent::Down(Point::new(380.0, 20.0)), ms(250));
    assert_eq!(tap.live_voices(), 1);
    let fresh = p.pad().voice().map(|v| v.id());
    assert_ne!(fresh, fading);
    let fading = fading.expect("pad voice");
    assert!(tap.snapshot(fading).is_none(), "old voice disposed");

    // well past when the cancelled disposal would have fired
    for frame in 0..30 {
        p.tick(ms(250 + frame * 16), &mut surface);
    }
    assert_eq!(tap.live_voices(), 1);
    assert_eq!(p.pad().voice().map(|v| v.state()), Some(VoiceState::Sustaining));
    assert_eq!(p.pad().voice().map(|v| v.id()), fresh);
}

#[test]
fn release_fades_to_the_floor_before_disposal() {
    let (mut p, tap) = offline_playground();
    let mut surface = FrameRecorder::new();

    p.handle(GestureEvent::Down(Point::new(20.0, 70.0)), ms(0));
    let id = p.keyboard().voice().map(|v| v.id()).expect("key pressed");
    tap.render(50);
    assert!((tap.snapshot(id).map_or(0.0, |v| v.level) - 0.3).abs() < 1e-6);

    p.handle(GestureEvent::Up(Point::new(20.0, 70.0)), ms(50));
    // 100 ms fade at 1 kHz
    tap.render(100);
    let snap = tap.snapshot(id).expect("still on the device during the guard");
    assert!(snap.releasing);
    assert_eq!(snap.level, RAMP_FLOOR);

    p.tick(ms(169), &mut surface);
    assert!(tap.snapshot(id).is_some());
    p.tick(ms(170), &mut surface);
    assert!(tap.snapshot(id).is_none());
    assert_eq!(p.keyboard().phase(), Phase::Idle);
}

#[test]
fn parameter_writes_land_on_the_next_block() {
    let (mut p, tap) = offline_playground();
    p.handle(GestureEvent::Down(Point::new(300.0, 0.0)), ms(0));
    let id = p.pad().voice().map(|v| v.id()).expect("pad voice");
    tap.render(32);

    // bottom of the pad is silent
    p.handle(GestureEvent::Move(Point::new(300.0, 99.9)), ms(10));
    assert!(tap.snapshot(id).map_or(0.0, |v| v.level) > 0.3, "write not yet rendered");
    tap.render(32);
    assert!(tap.snapshot(id).map_or(1.0, |v| v.level) < 0.01);
}

#[test]
fn freeze_holds_the_background_then_resumes() {
    let (mut p, _tap) = offline_playground();
    let mut surface = FrameRecorder::new();
    p.tick(ms(0), &mut surface);
    p.tick(ms(16), &mut surface);
    let before = p.renderer().frame().time_accumulator;

    // empty background
    p.handle(GestureEvent::Down(Point::new(590.0, 190.0)), ms(20));
    p.handle(GestureEvent::Up(Point::new(590.0, 190.0)), ms(30));
    for now in (32..820).step_by(16) {
        p.tick(ms(now), &mut surface);
        assert_eq!(p.renderer().frame().time_accumulator, before);
    }
    assert!(surface.last().is_some_and(|f| f.is_frozen()));

    p.tick(ms(820), &mut surface);
    assert!((p.renderer().frame().time_accumulator - before - 0.02).abs() < 1e-9);
    assert!(surface.last().is_some_and(|f| !f.is_frozen()));
}

#[test]
fn silent_engine_keeps_everything_working() {
    let engine = AudioEngine::new(EngineSettings::default(), |_| {
        Err(PlaygroundError::DeviceUnavailable("no output device".into()))
    });
    let mut p = Playground::with_engine(PlaygroundConfig::default(), engine);
    p.layout(layout());
    let mut surface = FrameRecorder::new();

    p.handle(GestureEvent::Down(Point::new(210.0, 150.0)), ms(0));
    assert_eq!(p.engine().state(), EngineState::Running);
    assert!(p.engine().is_silent());
    assert_eq!(p.captured(), Some(ControlId::Stem));
    assert_eq!(p.stem().phase(), Phase::Active);

    p.handle(GestureEvent::Up(Point::new(210.0, 150.0)), ms(10));
    p.trigger_sequence(ms(10));
    for frame in 0..60 {
        p.tick(ms(10 + frame * 16), &mut surface);
    }
    assert_eq!(p.stem().phase(), Phase::Idle);
    assert_eq!(p.sequence().sounding(), 0);
    assert_eq!(surface.frames(), 60);
    assert_eq!(surface.last().map(|f| f.layers.len()), Some(6));
}

#[test]
fn sequence_plays_six_notes_80ms_apart() {
    let (mut p, tap) = offline_playground();
    let mut surface = FrameRecorder::new();
    p.trigger_sequence(ms(1_000));

    let mut onsets = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for now in (1_000..1_900).step_by(5) {
        p.tick(ms(now), &mut surface);
        for voice in tap.voices() {
            if seen.insert(voice.id) {
                onsets.push((now, voice.frequency));
            }
        }
    }

    let expected = [261.63, 329.63, 392.00, 523.25, 659.25, 783.99];
    assert_eq!(onsets.len(), 6);
    for (i, &(at, hz)) in onsets.iter().enumerate() {
        assert_eq!(at, 1_000 + 80 * i as u64);
        assert_eq!(hz, expected[i]);
    }
    assert_eq!(tap.live_voices(), 0);
}

#[test]
fn suspend_ends_the_gesture_and_the_next_press_resumes() {
    let (mut p, tap) = offline_playground();
    p.handle(GestureEvent::Down(Point::new(210.0, 150.0)), ms(0));
    p.suspend(ms(5));
    assert_eq!(p.captured(), None);
    assert_eq!(p.stem().phase(), Phase::Releasing);
    assert!(tap.is_suspended());

    p.handle(GestureEvent::Down(Point::new(210.0, 150.0)), ms(50));
    assert_eq!(p.engine().state(), EngineState::Running);
    assert!(!tap.is_suspended());
    assert_eq!(tap.live_voices(), 1);
}
