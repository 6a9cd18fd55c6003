//! Benchmarks for the voice bank mix.
//!
//! Four gesture controls plus a six-note sequence is the busiest the
//! playground gets, so ten voices is the realistic ceiling.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use gesture_synth::{
    dsp::Waveform,
    synth::{bank::VoiceBank, Pluck, VoiceCommand, VoiceId},
};

use crate::BLOCK_SIZES;

fn bank_with(voices: u64) -> VoiceBank {
    let mut bank = VoiceBank::new(48_000.0, 16);
    for i in 0..voices {
        let waveform = Waveform::ALL[i as usize % Waveform::ALL.len()];
        bank.apply(VoiceCommand::Start {
            id: VoiceId(i),
            waveform,
            frequency: 220.0 + 55.0 * i as f32,
            gain: 0.1,
        });
    }
    bank
}

pub fn bench_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bank");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === SINGLE GESTURE ===
        let mut single = bank_with(1);
        group.bench_with_input(BenchmarkId::new("one_voice", size), &size, |b, _| {
            b.iter(|| {
                single.render_block(black_box(&mut buffer));
            })
        });

        // === EVERYTHING AT ONCE ===
        let mut busy = bank_with(4);
        for step in 0..6u64 {
            busy.apply(VoiceCommand::StartPlucked {
                id: VoiceId(100 + step),
                waveform: Waveform::Sine,
                frequency: 261.63 * (1.0 + step as f32 / 4.0),
                pluck: Pluck {
                    peak: 0.15,
                    attack: 0.02,
                    decay: 0.3,
                },
            });
        }
        group.bench_with_input(BenchmarkId::new("ten_voices", size), &size, |b, _| {
            b.iter(|| {
                busy.render_block(black_box(&mut buffer));
            })
        });

        // === RELEASING ===
        // fades hold at the floor until disposed, so this stays steady
        let mut fading = bank_with(4);
        for i in 0..4 {
            fading.apply(VoiceCommand::Release {
                id: VoiceId(i),
                fade_secs: 0.1,
            });
        }
        group.bench_with_input(BenchmarkId::new("four_releasing", size), &size, |b, _| {
            b.iter(|| {
                fading.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
