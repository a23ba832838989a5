use criterion::{Criterion, black_box, criterion_group, criterion_main};
use marg_fusion::{Madgwick, Mahony, MahonySettings};
use nalgebra::Vector3;
use rand::prelude::*;
use rand_pcg::Pcg64;
use std::f32::consts::PI;

const SAMPLE_RATE: f32 = 100.0;

// Pre-generated sensor data to eliminate RNG overhead during benchmarks
struct PreGeneratedData {
    samples: Vec<(Vector3<f32>, Vector3<f32>, Vector3<f32>)>,
    index: usize,
}

impl PreGeneratedData {
    fn new(count: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut samples = Vec::with_capacity(count);

        for i in 0..count {
            let time = i as f32 / SAMPLE_RATE;
            let motion_phase = time * 0.5 * 2.0 * PI;

            let gyroscope = Vector3::new(
                0.2 * motion_phase.sin() + rng.random_range(-0.01..0.01),
                0.2 * (motion_phase * 1.3).cos() + rng.random_range(-0.01..0.01),
                0.2 * (motion_phase * 0.7).sin() + rng.random_range(-0.01..0.01),
            );

            let accelerometer = Vector3::new(
                -0.1 * motion_phase.sin() + rng.random_range(-0.002..0.002),
                0.1 * motion_phase.cos() + rng.random_range(-0.002..0.002),
                1.0 + rng.random_range(-0.002..0.002),
            );

            let magnetometer = Vector3::new(
                0.6 + 0.05 * motion_phase.cos() + rng.random_range(-0.05..0.05),
                0.05 * motion_phase.sin() + rng.random_range(-0.05..0.05),
                -0.8 + rng.random_range(-0.05..0.05),
            );

            samples.push((gyroscope, accelerometer, magnetometer));
        }

        Self { samples, index: 0 }
    }

    fn next(&mut self) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
        let sample = self.samples[self.index];
        self.index = (self.index + 1) % self.samples.len();
        sample
    }
}

fn bench_madgwick_update(c: &mut Criterion) {
    let mut filter = Madgwick::<f32>::new(SAMPLE_RATE).unwrap();
    let mut data = PreGeneratedData::new(1024, 42);

    c.bench_function("madgwick_update", |b| {
        b.iter(|| {
            let (gyro, accel, mag) = data.next();
            filter.update(black_box(gyro), black_box(accel), black_box(mag));
        });
    });
}

fn bench_madgwick_update_imu(c: &mut Criterion) {
    let mut filter = Madgwick::<f32>::new(SAMPLE_RATE).unwrap();
    let mut data = PreGeneratedData::new(1024, 42);

    c.bench_function("madgwick_update_imu", |b| {
        b.iter(|| {
            let (gyro, accel, _) = data.next();
            filter.update_imu(black_box(gyro), black_box(accel));
        });
    });
}

fn bench_mahony_update(c: &mut Criterion) {
    let settings = MahonySettings {
        two_kp: 1.0,
        two_ki: 0.1,
    };
    let mut filter = Mahony::with_settings(SAMPLE_RATE, settings).unwrap();
    let mut data = PreGeneratedData::new(1024, 42);

    c.bench_function("mahony_update", |b| {
        b.iter(|| {
            let (gyro, accel, mag) = data.next();
            filter.update(black_box(gyro), black_box(accel), black_box(mag));
        });
    });
}

fn bench_mahony_update_imu(c: &mut Criterion) {
    let mut filter = Mahony::<f32>::new(SAMPLE_RATE).unwrap();
    let mut data = PreGeneratedData::new(1024, 42);

    c.bench_function("mahony_update_imu", |b| {
        b.iter(|| {
            let (gyro, accel, _) = data.next();
            filter.update_imu(black_box(gyro), black_box(accel));
        });
    });
}

fn bench_fast_inv_sqrt(c: &mut Criterion) {
    use marg_fusion::FastInvSqrt;

    c.bench_function("fast_inv_sqrt_f32", |b| {
        b.iter(|| black_box(1.7f32).fast_inv_sqrt());
    });
}

criterion_group!(
    benches,
    bench_madgwick_update,
    bench_madgwick_update_imu,
    bench_mahony_update,
    bench_mahony_update_imu,
    bench_fast_inv_sqrt,
);
criterion_main!(benches);
