// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `moodspace_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MoodSpaceConfig {
    pub network: NetworkConfig,
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub sensor: SensorConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

/// Station-mode network join settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub ssid: String,
    pub password: String,
    /// DHCP hostname announced by the board
    pub hostname: String,
    /// Give up joining after this many seconds
    pub connect_timeout_s: u64,
    /// Interval between link-state polls while joining
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            hostname: "MoodSpace-ESP32".to_string(),
            connect_timeout_s: 15,
            poll_interval_ms: 500,
        }
    }
}

/// Web endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Size of the single bounded read taken from each request
    pub read_chunk_bytes: usize,
    /// Read/write deadline for an accepted connection (0 disables)
    pub client_io_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            read_chunk_bytes: 1024,
            client_io_timeout_ms: 2000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Motion-to-chaos integration parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Displacements at or below this are treated as jitter
    pub dead_zone: u32,
    /// Chaos added per unit of displacement above the dead zone
    pub motion_gain: f32,
    /// Chaos removed on every tick without significant motion
    pub decay_per_tick: f32,
    /// Upper clamp of the chaos level
    pub ceiling: f32,
    /// Levels below this are Zen
    pub zen_below: f32,
    /// Levels at or above this are Chaotic
    pub chaotic_from: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dead_zone: 3,
            motion_gain: 0.5,
            decay_per_tick: 1.5,
            ceiling: 100.0,
            zen_below: 30.0,
            chaotic_from: 70.0,
        }
    }
}

/// Where block samples come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorSource {
    /// Seeded random walk, for desktop runs without hardware
    Simulated,
    /// JSON-lines recording played back in a loop
    Replay,
    /// Pixy2 camera on I2C (board builds only)
    Pixy2,
}

impl SensorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorSource::Simulated => "simulated",
            SensorSource::Replay => "replay",
            SensorSource::Pixy2 => "pixy2",
        }
    }
}

impl FromStr for SensorSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simulated" | "sim" => Ok(SensorSource::Simulated),
            "replay" => Ok(SensorSource::Replay),
            "pixy2" | "pixy" => Ok(SensorSource::Pixy2),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown sensor source '{}' (expected simulated, replay or pixy2)",
                other
            ))),
        }
    }
}

/// Sensor selection and Pixy2 bus parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SensorConfig {
    pub source: SensorSource,
    /// Recording used when `source = "replay"`
    pub replay_path: Option<PathBuf>,
    /// Seed for the simulated sensor (fixed seed = reproducible runs)
    pub seed: u64,
    pub i2c_address: u8,
    pub i2c_frequency_hz: u32,
    /// Bitmap of colour signatures to report (bit 0 = signature 1)
    pub signature_map: u8,
    /// Blocks requested per call; only the first is used
    pub max_blocks: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            source: SensorSource::Simulated,
            replay_path: None,
            seed: 0x5EED,
            i2c_address: 0x54,
            i2c_frequency_hz: 100_000,
            signature_map: 1,
            max_blocks: 1,
        }
    }
}

/// Main loop pacing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Fixed pause at the end of every loop iteration
    pub loop_pause_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { loop_pause_ms: 50 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for every crate without a debug flag
    pub level: String,
    /// Write rotating JSON log files (requires the `file-logging` feature)
    pub file_logging: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_source_parsing() {
        assert_eq!("Replay".parse::<SensorSource>().unwrap(), SensorSource::Replay);
        assert_eq!(" pixy ".parse::<SensorSource>().unwrap(), SensorSource::Pixy2);
        assert!("camera".parse::<SensorSource>().is_err());
    }

    #[test]
    fn test_bind_address() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..ServerConfig::default()
        };
        assert_eq!(server.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: MoodSpaceConfig = toml::from_str("[engine]\ndead_zone = 5\n").unwrap();
        assert_eq!(config.engine.dead_zone, 5);
        assert_eq!(config.engine.decay_per_tick, 1.5);
        assert_eq!(config.runtime.loop_pause_ms, 50);
    }
}
