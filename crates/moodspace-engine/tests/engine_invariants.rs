// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Invariants that must hold over long simulated sessions

use moodspace_engine::{ChaosEngine, EngineParams, MoodLabel, Sample};
use moodspace_hal::SimulatedSensor;

#[test]
fn test_level_stays_bounded_and_label_matches() {
    for seed in [1u64, 7, 0x5EED] {
        let mut engine = ChaosEngine::new(SimulatedSensor::new(seed), EngineParams::default());
        let mut previous = 0.0f32;
        let mut labels_seen = Vec::new();

        for _ in 0..3_000 {
            let report = engine.tick();
            assert!((0.0..=100.0).contains(&report.level));

            let status = engine.status();
            assert_eq!(status.chaos_level(), report.level as u32);
            assert_eq!(status.label(), MoodLabel::from_level(status.chaos_level()));

            if report.displacement <= 3 {
                assert!(report.level <= previous, "level rose on a still tick");
            }
            if !labels_seen.contains(&status.label()) {
                labels_seen.push(status.label());
            }
            previous = report.level;
        }

        // The frantic phase of the walk reaches the top band
        assert!(labels_seen.contains(&MoodLabel::Chaotic), "seed {} never got chaotic", seed);
    }
}

#[test]
fn test_json_snapshot_of_status() {
    let mut engine = ChaosEngine::new(SimulatedSensor::new(3), EngineParams::default());
    engine.observe(Sample::from(Some((10, 20))));
    let json = serde_json::to_value(engine.status()).unwrap();
    assert_eq!(json["label"], "Zen");
    assert_eq!(json["object_x"], 10);
    assert_eq!(json["object_y"], 20);
}
