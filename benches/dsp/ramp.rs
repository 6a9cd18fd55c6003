//! Benchmarks for gain ramps.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use gesture_synth::dsp::{GainRamp, RampCurve};

use crate::BLOCK_SIZES;

pub fn bench_ramp(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ramp");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![1.0f32; size];

        // Steady - the common case while a gesture holds a note
        let mut ramp = GainRamp::new(0.3);
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| {
                ramp.apply(black_box(&mut buffer));
            })
        });

        // Linear - gesture gain smoothing, re-armed every block
        let mut ramp = GainRamp::new(0.0);
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| {
                ramp.ramp_to(0.3, size as u32, RampCurve::Linear);
                ramp.apply(black_box(&mut buffer));
            })
        });

        // Exponential - release fade, re-armed every block
        let mut ramp = GainRamp::new(0.3);
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, _| {
            b.iter(|| {
                ramp.set(0.3);
                ramp.ramp_to(0.0, size as u32, RampCurve::Exponential);
                ramp.apply(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
