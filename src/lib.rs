// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! # MoodSpace Kinetic
//!
//! A single-board motion-agitation monitor. A vision sensor reports where a
//! tracked object is; the engine turns frame-to-frame displacement into a
//! bounded chaos score; a non-blocking dispatcher serves that score and a
//! small monitor page over HTTP. One thread runs everything.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! moodspace = "0.3"   # host build: simulated and replayed sensors
//! ```
//!
//! ## Feature Flags
//!
//! - **`platform-host`** (default): desktop build
//! - **`platform-esp32`**: ESP32 board support (Pixy2 on I2C, Wi-Fi station mode)
//! - **`file-logging`**: rotating JSON log files
//!
//! ## Usage
//!
//! ```rust
//! use moodspace::prelude::*;
//!
//! let sensor = ScriptedSensor::from_positions([Some((10, 10)), Some((14, 10)), None, Some((5, 5))]);
//! let mut engine = ChaosEngine::new(sensor, EngineParams::default());
//!
//! let levels: Vec<f32> = (0..4).map(|_| engine.tick().level).collect();
//! assert_eq!(levels, vec![0.0, 2.0, 0.5, 0.0]);
//! assert_eq!(engine.status().label(), MoodLabel::Zen);
//! ```

pub use moodspace_api as api;
pub use moodspace_config as config;
pub use moodspace_engine as engine;
pub use moodspace_hal as hal;
pub use moodspace_monitor as monitor;
pub use moodspace_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::api::{DispatchOutcome, DispatcherConfig, RequestDispatcher, Route, StatusDto};
    pub use crate::config::{load_config, load_config_or_default, validate_config, MoodSpaceConfig, SensorSource};
    pub use crate::engine::{ChaosEngine, EngineParams, MoodLabel, Sample, SystemStatus};
    pub use crate::hal::prelude::*;
    pub use crate::monitor::{open_sensor, IterationReport, MonitorLoop, SelectedSensor};
    pub use crate::observability::{init_logging, CrateDebugFlags};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
