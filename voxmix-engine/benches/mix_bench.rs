//! Mixer Throughput Performance Benchmark
//!
//! Measures how far faster than realtime a full mix runs.
//!
//! **Cases:** same-format music (gain/loop/fade/overlay only) and music that
//! also needs resampling and channel remapping.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxmix_engine::{mix, AudioBuffer, MixParameters};

fn sine(seconds: usize, rate: u32, channels: u16) -> AudioBuffer {
    let frames = seconds * rate as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let value = (i as f32 * 0.05).sin() * 0.5;
        for _ in 0..channels {
            samples.push(value);
        }
    }
    AudioBuffer::new(samples, rate, channels).unwrap()
}

fn bench_mix_same_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixer_throughput");

    let voice = sine(10, 44_100, 2);
    let music = sine(3, 44_100, 2);
    let params = MixParameters::new(30, true, true);

    group.bench_function("same_format_10s", |b| {
        b.iter(|| black_box(mix(&voice, &music, &params).unwrap()));
    });

    group.finish();
}

fn bench_mix_with_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixer_throughput");
    group.sample_size(20);

    let voice = sine(10, 44_100, 1);
    let music = sine(3, 22_050, 2);
    let params = MixParameters::new(30, true, false);

    group.bench_function("resample_remap_10s", |b| {
        b.iter(|| black_box(mix(&voice, &music, &params).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_mix_same_format, bench_mix_with_alignment);
criterion_main!(benches);
