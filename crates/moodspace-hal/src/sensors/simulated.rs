// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Synthetic sensor for running without a camera
//!
//! A single object wanders the Pixy2 frame in a random walk. The step size
//! cycles through calm, restless and frantic phases so the agitation level
//! visits every band, and the object occasionally leaves and re-enters view.

use std::convert::Infallible;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::hal::{Block, BlockList, BlockSensor};

/// Pixy2 colour-connected-components frame size
pub const FRAME_WIDTH: u16 = 316;
pub const FRAME_HEIGHT: u16 = 208;

/// Reads spent in each phase before moving to the next
const PHASE_LENGTH: u64 = 120;

/// Maximum step per read in each phase, in pixels
const PHASE_STEPS: [i32; 3] = [1, 6, 24];

const LEAVE_PROBABILITY: f64 = 0.01;
const ENTER_PROBABILITY: f64 = 0.15;

/// Seeded random-walk sensor; the same seed replays the same session
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    rng: StdRng,
    position: Option<(i32, i32)>,
    reads: u64,
}

impl SimulatedSensor {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            position: Some((i32::from(FRAME_WIDTH) / 2, i32::from(FRAME_HEIGHT) / 2)),
            reads: 0,
        }
    }

    /// Current phase index: 0 calm, 1 restless, 2 frantic
    pub fn phase(&self) -> usize {
        ((self.reads / PHASE_LENGTH) % PHASE_STEPS.len() as u64) as usize
    }

    fn step(&mut self) {
        let max_step = PHASE_STEPS[self.phase()];
        self.position = match self.position {
            Some(_) if self.rng.gen_bool(LEAVE_PROBABILITY) => None,
            Some((x, y)) => {
                let dx = self.rng.gen_range(-max_step..=max_step);
                let dy = self.rng.gen_range(-max_step..=max_step);
                Some((
                    (x + dx).clamp(0, i32::from(FRAME_WIDTH) - 1),
                    (y + dy).clamp(0, i32::from(FRAME_HEIGHT) - 1),
                ))
            }
            None if self.rng.gen_bool(ENTER_PROBABILITY) => Some((
                self.rng.gen_range(0..i32::from(FRAME_WIDTH)),
                self.rng.gen_range(0..i32::from(FRAME_HEIGHT)),
            )),
            None => None,
        };
        self.reads += 1;
    }
}

impl BlockSensor for SimulatedSensor {
    type Error = Infallible;

    fn get_blocks(&mut self) -> Result<BlockList, Self::Error> {
        self.step();
        let mut blocks = BlockList::new();
        if let Some((x, y)) = self.position {
            // Clamped to the frame above, so both fit in u16
            let _ = blocks.push(Block::at(x as u16, y as u16));
        }
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(sensor: &mut SimulatedSensor, reads: usize) -> Vec<Option<(u16, u16)>> {
        (0..reads)
            .map(|_| sensor.get_blocks().unwrap().first().map(|b| (b.x, b.y)))
            .collect()
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = SimulatedSensor::new(7);
        let mut b = SimulatedSensor::new(7);
        assert_eq!(positions(&mut a, 500), positions(&mut b, 500));
    }

    #[test]
    fn test_stays_inside_frame() {
        let mut sensor = SimulatedSensor::new(42);
        for (x, y) in positions(&mut sensor, 2000).into_iter().flatten() {
            assert!(x < FRAME_WIDTH);
            assert!(y < FRAME_HEIGHT);
        }
    }

    #[test]
    fn test_phases_cycle() {
        let mut sensor = SimulatedSensor::new(1);
        assert_eq!(sensor.phase(), 0);
        positions(&mut sensor, PHASE_LENGTH as usize);
        assert_eq!(sensor.phase(), 1);
        positions(&mut sensor, 2 * PHASE_LENGTH as usize);
        assert_eq!(sensor.phase(), 0);
    }
}
