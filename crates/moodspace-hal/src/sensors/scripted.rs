// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;

use crate::hal::{Block, BlockList, BlockSensor};

/// Injected read failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("scripted sensor fault")]
pub struct ScriptedFault;

/// Sensor that plays back a fixed list of frames, then reports nothing
///
/// Used to drive the engine deterministically in tests.
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    frames: VecDeque<Result<BlockList, ScriptedFault>>,
    reads: u64,
}

impl ScriptedSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `Some((x, y))` for a detection and `None` for an empty frame
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Option<(u16, u16)>>,
    {
        let mut sensor = Self::new();
        for position in positions {
            match position {
                Some((x, y)) => sensor.push_block(Block::at(x, y)),
                None => sensor.push_empty(),
            };
        }
        sensor
    }

    pub fn push_block(&mut self, block: Block) -> &mut Self {
        let mut frame = BlockList::new();
        let _ = frame.push(block);
        self.frames.push_back(Ok(frame));
        self
    }

    pub fn push_frame(&mut self, frame: BlockList) -> &mut Self {
        self.frames.push_back(Ok(frame));
        self
    }

    pub fn push_empty(&mut self) -> &mut Self {
        self.frames.push_back(Ok(BlockList::new()));
        self
    }

    pub fn push_fault(&mut self) -> &mut Self {
        self.frames.push_back(Err(ScriptedFault));
        self
    }

    /// Frames not yet consumed
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl BlockSensor for ScriptedSensor {
    type Error = ScriptedFault;

    fn get_blocks(&mut self) -> Result<BlockList, Self::Error> {
        self.reads += 1;
        self.frames.pop_front().unwrap_or_else(|| Ok(BlockList::new()))
    }
}
