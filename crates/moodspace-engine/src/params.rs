// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use moodspace_config::EngineConfig;

/// Label thresholds on the chaos level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    /// Levels below this are Zen
    pub zen_below: f32,
    /// Levels at or above this are Chaotic
    pub chaotic_from: f32,
}

impl Default for Bands {
    fn default() -> Self {
        Self {
            zen_below: 30.0,
            chaotic_from: 70.0,
        }
    }
}

/// Integration constants for [`crate::ChaosEngine`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    /// Displacements at or below this (pixels, Manhattan) count as stillness
    pub dead_zone: u32,
    /// Level gained per pixel of displacement above the dead zone
    pub gain: f32,
    /// Level lost on a still or empty tick
    pub decay: f32,
    pub ceiling: f32,
    pub bands: Bands,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            dead_zone: 3,
            gain: 0.5,
            decay: 1.5,
            ceiling: 100.0,
            bands: Bands::default(),
        }
    }
}

impl From<&EngineConfig> for EngineParams {
    fn from(config: &EngineConfig) -> Self {
        Self {
            dead_zone: config.dead_zone,
            gain: config.motion_gain,
            decay: config.decay_per_tick,
            ceiling: config.ceiling,
            bands: Bands {
                zen_below: config.zen_below,
                chaotic_from: config.chaotic_from,
            },
        }
    }
}
