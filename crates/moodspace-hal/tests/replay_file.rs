// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use moodspace_hal::{BlockSensor, ReplayError, ReplaySensor};

#[test]
fn test_replay_from_disk_loops() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{{\"x\": 10, \"y\": 10}}").unwrap();
    writeln!(file, "{{\"x\": 14, \"y\": 10}}").unwrap();
    writeln!(file, "null").unwrap();

    let mut sensor = ReplaySensor::from_path(file.path()).unwrap();
    assert_eq!(sensor.len(), 3);

    let xs: Vec<Option<u16>> = (0..4)
        .map(|_| sensor.get_blocks().unwrap().first().map(|b| b.x))
        .collect();
    assert_eq!(xs, vec![Some(10), Some(14), None, Some(10)]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ReplaySensor::from_path(&dir.path().join("absent.jsonl")).unwrap_err();
    assert!(matches!(err, ReplayError::Io { .. }));
}
