//! # Arc Kinematics Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use odom_lib::odom::kinematics::pose_delta;
use odom_lib::odom::SlipComp;

fn kinematics_benchmark(c: &mut Criterion) {
    let slip = SlipComp::default();

    // Straight-line special case
    c.bench_function("pose_delta straight", |b| {
        b.iter(|| pose_delta(black_box(0.42), black_box(0.42), 1.0, 0.12, &slip))
    });

    // Gentle arc, no compensation
    c.bench_function("pose_delta gentle arc", |b| {
        b.iter(|| pose_delta(black_box(0.50), black_box(0.31), 1.0, 0.12, &slip))
    });

    // Pivot turn, sharp-turn compensation path
    c.bench_function("pose_delta pivot", |b| {
        b.iter(|| pose_delta(black_box(0.10), black_box(-0.10), 1.0, 0.12, &slip))
    });
}

criterion_group!(benches, kinematics_benchmark);
criterion_main!(benches);
