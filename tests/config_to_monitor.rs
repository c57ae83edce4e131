// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration file driving sensor choice and engine tuning

use std::io::Write;
use std::time::Duration;

use moodspace::prelude::*;

#[test]
fn test_replay_session_from_config_file() {
    let dir = tempfile::tempdir().unwrap();

    let recording = dir.path().join("session.jsonl");
    let mut file = std::fs::File::create(&recording).unwrap();
    writeln!(file, "{{\"x\": 100, \"y\": 100}}").unwrap();
    writeln!(file, "{{\"x\": 110, \"y\": 100}}").unwrap();

    let config_path = dir.path().join("moodspace_configuration.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "[server]\nhost = \"127.0.0.1\"\nport = 8080").unwrap();
    writeln!(file, "[engine]\nmotion_gain = 1.0").unwrap();
    writeln!(file, "[sensor]\nsource = \"replay\"\nreplay_path = {:?}", recording.display().to_string()).unwrap();

    let mut overrides = std::collections::HashMap::new();
    overrides.insert("server_port".to_string(), "0".to_string());
    let config = load_config(Some(&config_path), Some(&overrides)).unwrap();

    // Port 0 is rejected for deployment but lets the test pick a free port
    let errors = moodspace::config::validation::collect_errors(&config);
    assert_eq!(errors.len(), 1);

    let sensor = open_sensor(&config.sensor).unwrap();
    assert_eq!(sensor.source(), SensorSource::Replay);

    let engine = ChaosEngine::new(sensor, EngineParams::from(&config.engine));
    let mut dispatcher = RequestDispatcher::new(DispatcherConfig::from(&config.server));
    dispatcher.start().unwrap();
    let mut monitor = MonitorLoop::new(engine, dispatcher, HostPlatform::new(), Duration::ZERO);

    monitor.run_iteration();
    let report = monitor.run_iteration();
    assert_eq!(report.tick.displacement, 10);
    assert_eq!(report.tick.level, 10.0);
}

#[test]
fn test_shipped_configuration_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("moodspace_configuration.toml");
    let config = load_config(Some(&path), None).unwrap();
    validate_config(&config).unwrap();
    assert_eq!(config.sensor.seed, 0x5EED);
    assert_eq!(config.sensor.i2c_address, 0x54);
}

#[test]
fn test_shipped_recording_replays() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("recordings/classroom.jsonl");
    let sensor = ReplaySensor::from_path(&path).unwrap();
    assert_eq!(sensor.len(), 13);
}
