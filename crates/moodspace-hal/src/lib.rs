// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! # MoodSpace HAL
//!
//! Platform abstraction for the MoodSpace motion monitor.
//!
//! This crate provides:
//! - **HAL traits** (`hal` module): clock, block sensor and network link seams
//! - **Sensors** (`sensors` module): Pixy2 I2C driver plus scripted, replayed
//!   and simulated sources
//! - **Platforms** (`platforms` module): host (std) and ESP32 (ESP-IDF)
//! - **Bootstrap** (`bootstrap` module): station-mode join with a fixed attempt ceiling
//! - **Diagnostics** (`diagnostics` module): SPI bus probe
//!
//! ## Usage
//!
//! ```rust
//! use moodspace_hal::prelude::*;
//!
//! let mut sensor = ScriptedSensor::from_positions([Some((10, 10)), None]);
//! assert_eq!(sensor.get_blocks().unwrap().len(), 1);
//! assert!(sensor.get_blocks().unwrap().is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! - `esp32` - ESP32 family support (`esp32-s3`, `esp32-c3` select the chip name)

/// Hardware abstraction traits shared by all platforms.
pub mod hal;

/// Block sensor implementations.
pub mod sensors;

/// Concrete platform implementations (host, ESP32).
pub mod platforms;

/// Network bootstrap.
pub mod bootstrap;

/// Bus diagnostics.
pub mod diagnostics;

pub use bootstrap::{attempt_ceiling, join_network, BootstrapError};
pub use diagnostics::{probe_bus, BusProbeReport, BusVerdict};
pub use hal::{Block, BlockList, BlockSensor, NetworkLink, Platform, TimeProvider, WifiCredentials, MAX_BLOCKS};
pub use platforms::{HostNetwork, HostPlatform};
pub use sensors::{
    Pixy2, Pixy2Config, Pixy2Error, Pixy2Version, ReplayError, ReplaySensor, ScriptedFault, ScriptedSensor,
    SimulatedSensor,
};

#[cfg(feature = "esp32")]
pub use platforms::{Esp32Board, Esp32Platform, Esp32WifiLink, Pixy2I2c};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bootstrap::{join_network, BootstrapError};
    pub use crate::hal::*;
    pub use crate::platforms::*;
    pub use crate::sensors::*;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
