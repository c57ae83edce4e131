// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use moodspace_hal::{Block, BlockList};
use serde::Serialize;

use crate::params::Bands;

/// Centre of the tracked object in camera pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Centroid {
    pub x: u16,
    pub y: u16,
}

impl Centroid {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance in pixels
    pub fn manhattan(&self, other: &Centroid) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }
}

impl From<&Block> for Centroid {
    fn from(block: &Block) -> Self {
        Self::new(block.x, block.y)
    }
}

/// One sensor reading, reduced to the first detected object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    Present(Centroid),
    Absent,
}

impl Sample {
    /// First block wins; the rest are ignored
    pub fn from_blocks(blocks: &BlockList) -> Self {
        blocks
            .first()
            .map_or(Sample::Absent, |block| Sample::Present(block.into()))
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Sample::Present(_))
    }
}

impl From<Option<(u16, u16)>> for Sample {
    fn from(position: Option<(u16, u16)>) -> Self {
        position.map_or(Sample::Absent, |(x, y)| Sample::Present(Centroid::new(x, y)))
    }
}

/// Where the object was on the previous tick, if it was seen at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingState {
    last: Option<Centroid>,
}

impl TrackingState {
    pub fn last(&self) -> Option<Centroid> {
        self.last
    }

    pub fn is_tracking(&self) -> bool {
        self.last.is_some()
    }

    /// Record a sighting and return the displacement from the previous one
    ///
    /// A first sighting has no reference point and reports zero.
    pub fn advance(&mut self, current: Centroid) -> u32 {
        let displacement = self.last.map_or(0, |last| current.manhattan(&last));
        self.last = Some(current);
        displacement
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Qualitative agitation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoodLabel {
    Zen,
    Active,
    Chaotic,
}

impl MoodLabel {
    /// Classify with the default 30 / 70 thresholds
    pub fn from_level(level: u32) -> Self {
        Self::classify(level as f32, &Bands::default())
    }

    pub fn classify(level: f32, bands: &Bands) -> Self {
        if level < bands.zen_below {
            MoodLabel::Zen
        } else if level < bands.chaotic_from {
            MoodLabel::Active
        } else {
            MoodLabel::Chaotic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Zen => "Zen",
            MoodLabel::Active => "Active",
            MoodLabel::Chaotic => "Chaotic",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot published after every tick
///
/// The label is always derived from the level; there is no way to build a
/// status where the two disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    chaos_level: u32,
    label: MoodLabel,
    object_x: u16,
    object_y: u16,
}

impl SystemStatus {
    /// Status with the default label thresholds
    pub fn new(chaos_level: u32, object_x: u16, object_y: u16) -> Self {
        Self::with_bands(chaos_level as f32, &Bands::default(), object_x, object_y)
    }

    /// Status for an accumulator value; the level is truncated, the label is
    /// taken from the untruncated value
    pub fn with_bands(level: f32, bands: &Bands, object_x: u16, object_y: u16) -> Self {
        Self {
            chaos_level: level as u32,
            label: MoodLabel::classify(level, bands),
            object_x,
            object_y,
        }
    }

    pub fn chaos_level(&self) -> u32 {
        self.chaos_level
    }

    pub fn label(&self) -> MoodLabel {
        self.label
    }

    pub fn object_x(&self) -> u16 {
        self.object_x
    }

    pub fn object_y(&self) -> u16 {
        self.object_y
    }
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}
