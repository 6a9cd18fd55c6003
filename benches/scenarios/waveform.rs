//! Benchmarks for background frame geometry.

use std::{hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion};
use gesture_synth::{
    config::{FreezePolicy, RendererConfig},
    render::{FrameRecorder, WaveformRenderer},
};

/// Logical surface widths: phone, laptop, wide monitor.
const WIDTHS: &[f32] = &[400.0, 1280.0, 2560.0];

pub fn bench_waveform(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/waveform");

    for &width in WIDTHS {
        let mut renderer = WaveformRenderer::new(&RendererConfig::default(), FreezePolicy::default());
        renderer.resize(width, 400.0, 2.0);
        let mut surface = FrameRecorder::new();
        let mut now = Duration::ZERO;

        group.bench_with_input(BenchmarkId::new("tick", width as u32), &width, |b, _| {
            b.iter(|| {
                now += Duration::from_millis(16);
                renderer.tick(black_box(now), &mut surface);
            })
        });
    }

    group.finish();
}
