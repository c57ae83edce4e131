// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! # MoodSpace Monitor
//!
//! The cooperative main loop: one engine tick, one non-blocking dispatch
//! attempt, one fixed pause, forever. Nothing here spawns threads.

pub mod runner;
pub mod sensor;

pub use runner::{IterationReport, MonitorLoop};
pub use sensor::{open_sensor, SelectedSensor, SensorFault};
