// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use moodspace_engine::{ChaosEngine, EngineParams};
use moodspace_hal::SimulatedSensor;

fn bench_tick(c: &mut Criterion) {
    let mut engine = ChaosEngine::new(SimulatedSensor::new(0x5EED), EngineParams::default());
    c.bench_function("chaos_engine_tick_simulated", |b| {
        b.iter(|| black_box(engine.tick()))
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
