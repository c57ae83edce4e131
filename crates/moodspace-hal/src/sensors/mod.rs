// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

/// Pixy2 camera over I2C.
pub mod pixy2;
/// Recorded sessions (JSON lines).
pub mod replay;
/// Fixed frame lists for tests.
pub mod scripted;
/// Seeded random walk for running without hardware.
pub mod simulated;

pub use pixy2::{Pixy2, Pixy2Config, Pixy2Error, Pixy2Version};
pub use replay::{ReplayError, ReplaySensor};
pub use scripted::{ScriptedFault, ScriptedSensor};
pub use simulated::SimulatedSensor;
