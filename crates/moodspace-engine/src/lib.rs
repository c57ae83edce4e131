// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! # MoodSpace Engine
//!
//! Turns the position of one tracked object into a bounded "chaos" score.
//!
//! Each tick reads the sensor once. Displacement since the previous sighting
//! above the dead zone raises the level; anything else (stillness, small
//! jitter, nothing in view) lets it decay. The level is clamped to
//! `[0, ceiling]` and published as a [`SystemStatus`] with a qualitative
//! [`MoodLabel`].

pub mod engine;
pub mod params;
pub mod types;

pub use engine::{ChaosEngine, TickReport, MAX_LEVEL};
pub use params::{Bands, EngineParams};
pub use types::{Centroid, MoodLabel, Sample, SystemStatus, TrackingState};
