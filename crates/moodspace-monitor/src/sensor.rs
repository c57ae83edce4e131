// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Sensor selection from configuration

use anyhow::{bail, Context};
use moodspace_config::{SensorConfig, SensorSource};
use moodspace_hal::{BlockList, BlockSensor, ReplaySensor, SimulatedSensor};
use tracing::info;

/// Read failure from whichever sensor is active
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SensorFault(String);

/// The sensor chosen at startup
#[derive(Debug)]
pub enum SelectedSensor {
    Simulated(SimulatedSensor),
    Replay(ReplaySensor),
    #[cfg(feature = "esp32")]
    Pixy2(moodspace_hal::Pixy2I2c),
}

impl SelectedSensor {
    pub fn source(&self) -> SensorSource {
        match self {
            SelectedSensor::Simulated(_) => SensorSource::Simulated,
            SelectedSensor::Replay(_) => SensorSource::Replay,
            #[cfg(feature = "esp32")]
            SelectedSensor::Pixy2(_) => SensorSource::Pixy2,
        }
    }
}

impl BlockSensor for SelectedSensor {
    type Error = SensorFault;

    fn get_blocks(&mut self) -> Result<BlockList, Self::Error> {
        match self {
            SelectedSensor::Simulated(sensor) => sensor.get_blocks().map_err(|e| match e {}),
            SelectedSensor::Replay(sensor) => sensor.get_blocks().map_err(|e| match e {}),
            #[cfg(feature = "esp32")]
            SelectedSensor::Pixy2(sensor) => sensor.get_blocks().map_err(|e| SensorFault(e.to_string())),
        }
    }
}

/// Open a sensor that needs no board peripherals
///
/// `pixy2` needs the I2C bus and is built by the board setup instead.
pub fn open_sensor(config: &SensorConfig) -> anyhow::Result<SelectedSensor> {
    match config.source {
        SensorSource::Simulated => {
            info!(target: "moodspace-monitor", "Using simulated sensor (seed {:#x})", config.seed);
            Ok(SelectedSensor::Simulated(SimulatedSensor::new(config.seed)))
        }
        SensorSource::Replay => {
            let path = config
                .replay_path
                .as_deref()
                .context("sensor.replay_path is required for the replay source")?;
            let sensor = ReplaySensor::from_path(path)
                .with_context(|| format!("Failed to load recording {}", path.display()))?;
            info!(
                target: "moodspace-monitor",
                "Replaying {} frames from {}",
                sensor.len(),
                path.display()
            );
            Ok(SelectedSensor::Replay(sensor))
        }
        SensorSource::Pixy2 => {
            bail!("the pixy2 source needs the board I2C bus; build with the esp32 feature")
        }
    }
}
