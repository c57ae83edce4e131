// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

/// Network link (station-mode join) traits.
pub mod network;
/// Object-detection sensor traits and block records.
pub mod sensor;
/// Timekeeping abstractions (monotonic timers, delays).
pub mod time;

pub use network::{NetworkLink, WifiCredentials};
pub use sensor::{Block, BlockList, BlockSensor, MAX_BLOCKS};
pub use time::TimeProvider;

/// Convenience trait combining common platform capabilities
pub trait Platform: TimeProvider {
    /// Get platform name (e.g., "ESP32", "host")
    fn name(&self) -> &'static str;

    /// Get platform uptime in milliseconds
    fn uptime_ms(&self) -> u64 {
        self.get_time_us() / 1000
    }
}
