//! Benchmarks for the PSG render hot path
//!
//! Run with: cargo bench --bench psg

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use huc6280_psg::{Psg, PsgConfig, Register};
use std::hint::black_box;

fn tone_chip(config: PsgConfig) -> Psg {
    let mut psg = Psg::new(config).unwrap();
    psg.set_global_volume(0xFF);
    for ch in 0..4 {
        psg.write_register(ch, Register::FreqLo, 0x80 + ch as u8 * 0x10).unwrap();
        psg.write_register(ch, Register::Balance, 0xFF).unwrap();
        psg.write_register(ch, Register::Control, 0x9F).unwrap();
        for i in 0..32 {
            psg.write_waveform(ch, i, (i as u8 * 7) & 0x1F).unwrap();
        }
    }
    psg
}

fn bench_render_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_tick");

    for samples in [128usize, 735, 800].iter() {
        let mut psg = tone_chip(PsgConfig::stereo(44_100));
        let mut out = vec![0i16; 2 * samples];
        group.bench_with_input(BenchmarkId::from_parameter(samples), samples, |b, &samples| {
            b.iter(|| {
                psg.render(&mut out, samples).unwrap();
                black_box(&out);
            });
        });
    }

    group.finish();
}

fn bench_render_mono(c: &mut Criterion) {
    let mut psg = tone_chip(PsgConfig::mono(44_100));
    let mut out = vec![0i16; 735];

    c.bench_function("render_mono_735", |b| {
        b.iter(|| {
            psg.render(&mut out, 735).unwrap();
            black_box(&out);
        });
    });
}

fn bench_noise_channels(c: &mut Criterion) {
    let mut psg = Psg::new(PsgConfig::stereo(44_100)).unwrap();
    psg.set_global_volume(0xFF);
    for ch in 4..6 {
        psg.write_register(ch, Register::Control, 0x9F).unwrap();
        psg.write_register(ch, Register::Balance, 0xFF).unwrap();
        psg.write_register(ch, Register::Noise, 0x80 | ch as u8).unwrap();
    }
    let mut out = vec![0i16; 2 * 735];

    c.bench_function("noise_two_channels", |b| {
        b.iter(|| {
            psg.render(&mut out, 735).unwrap();
            black_box(&out);
        });
    });
}

fn bench_direct_audio(c: &mut Criterion) {
    let mut psg = Psg::new(PsgConfig::stereo(44_100)).unwrap();
    psg.set_global_volume(0xFF);
    psg.write_register(0, Register::Control, 0xDF).unwrap();
    psg.write_register(0, Register::Balance, 0xFF).unwrap();
    let mut out = vec![0i16; 2 * 735];

    c.bench_function("direct_audio_tick", |b| {
        b.iter(|| {
            while psg.pending_direct_samples(0).unwrap() < 128 {
                psg.push_direct_sample(0, black_box(0x15)).unwrap();
            }
            psg.render(&mut out, 735).unwrap();
            black_box(&out);
        });
    });
}

fn bench_port_writes(c: &mut Criterion) {
    let mut psg = Psg::new(PsgConfig::default()).unwrap();

    c.bench_function("write_port_waveform", |b| {
        b.iter(|| {
            psg.write_port(0, black_box(2));
            psg.write_port(4, 0x00);
            for i in 0..32u8 {
                psg.write_port(6, black_box(i));
            }
            psg.write_port(4, 0x9F);
        });
    });
}

criterion_group!(
    benches,
    bench_render_tick,
    bench_render_mono,
    bench_noise_channels,
    bench_direct_audio,
    bench_port_writes
);
criterion_main!(benches);
