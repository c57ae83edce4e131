// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Upper bound on blocks returned by a single read
pub const MAX_BLOCKS: usize = 8;

/// One detected colour-signature object, as reported by the camera
///
/// Coordinates are the bounding-box centre in camera pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub signature: u16,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Only meaningful for colour-code signatures
    pub angle: i16,
    /// Tracking index assigned by the camera
    pub index: u8,
    /// Frames this object has been tracked for (saturates at 255)
    pub age: u8,
}

impl Block {
    /// Signature-1 block centred at `(x, y)` with a nominal size
    pub fn at(x: u16, y: u16) -> Self {
        Self {
            signature: 1,
            x,
            y,
            width: 10,
            height: 10,
            ..Self::default()
        }
    }
}

/// Blocks returned by one sensor read, largest first
pub type BlockList = heapless::Vec<Block, MAX_BLOCKS>;

/// Object-detection sensor
///
/// A read returns zero or more blocks. Callers that track a single object
/// use the first one and ignore the rest.
pub trait BlockSensor {
    /// Platform-specific error type
    type Error: core::fmt::Debug;

    /// Read the current set of detected blocks
    fn get_blocks(&mut self) -> Result<BlockList, Self::Error>;
}

impl<S: BlockSensor + ?Sized> BlockSensor for &mut S {
    type Error = S::Error;

    fn get_blocks(&mut self) -> Result<BlockList, Self::Error> {
        (**self).get_blocks()
    }
}

impl<S: BlockSensor + ?Sized> BlockSensor for Box<S> {
    type Error = S::Error;

    fn get_blocks(&mut self) -> Result<BlockList, Self::Error> {
        (**self).get_blocks()
    }
}
