// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Platform implementations
//!
//! Each platform module implements the traits defined in `crate::hal`.
//! The host platform is always available; ESP32 is selected with the
//! `esp32` feature.

pub mod host;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use host::{HostNetwork, HostPlatform};

#[cfg(feature = "esp32")]
pub use esp32::{Esp32Board, Esp32Platform, Esp32WifiError, Esp32WifiLink, Pixy2I2c, SpiProbeDevice};
