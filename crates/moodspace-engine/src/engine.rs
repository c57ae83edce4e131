// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Motion-to-chaos state machine

use moodspace_hal::BlockSensor;
use tracing::{debug, warn};

use crate::params::EngineParams;
use crate::types::{Sample, SystemStatus, TrackingState};

/// Hard upper bound on the level, whatever the configured ceiling
pub const MAX_LEVEL: f32 = 100.0;

/// What one tick saw and did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub sample: Sample,
    pub displacement: u32,
    /// Level after clamping, before truncation
    pub level: f32,
    /// The sensor read failed and the tick was treated as empty
    pub sensor_fault: bool,
}

/// Owns the sensor, the tracking state and the chaos accumulator
#[derive(Debug)]
pub struct ChaosEngine<S: BlockSensor> {
    sensor: S,
    params: EngineParams,
    tracking: TrackingState,
    level: f32,
    status: SystemStatus,
    ticks: u64,
    sensor_faults: u64,
    faulting: bool,
}

impl<S: BlockSensor> ChaosEngine<S> {
    pub fn new(sensor: S, params: EngineParams) -> Self {
        Self {
            sensor,
            params,
            tracking: TrackingState::default(),
            level: 0.0,
            status: SystemStatus::with_bands(0.0, &params.bands, 0, 0),
            ticks: 0,
            sensor_faults: 0,
            faulting: false,
        }
    }

    /// Read the sensor once and integrate the result
    ///
    /// A failed read is logged and counts as "nothing in view".
    pub fn tick(&mut self) -> TickReport {
        let (sample, sensor_fault) = match self.sensor.get_blocks() {
            Ok(blocks) => {
                self.faulting = false;
                (Sample::from_blocks(&blocks), false)
            }
            Err(e) => {
                self.sensor_faults += 1;
                if !self.faulting {
                    warn!(target: "moodspace-engine", "Sensor read failed, treating as no object: {:?}", e);
                } else {
                    debug!(target: "moodspace-engine", "Sensor read failed again: {:?}", e);
                }
                self.faulting = true;
                (Sample::Absent, true)
            }
        };

        TickReport {
            sensor_fault,
            ..self.observe(sample)
        }
    }

    /// Integrate an already-read sample
    pub fn observe(&mut self, sample: Sample) -> TickReport {
        let (displacement, x, y) = match sample {
            Sample::Present(centroid) => (self.tracking.advance(centroid), centroid.x, centroid.y),
            Sample::Absent => {
                self.tracking.reset();
                // Position persists from the last detection
                (0, self.status.object_x(), self.status.object_y())
            }
        };

        if displacement > self.params.dead_zone {
            self.level += displacement as f32 * self.params.gain;
        } else {
            self.level -= self.params.decay;
        }
        self.level = self.level.clamp(0.0, self.params.ceiling.min(MAX_LEVEL));

        self.status = SystemStatus::with_bands(self.level, &self.params.bands, x, y);
        self.ticks += 1;

        debug!(
            target: "moodspace-engine",
            "tick {}: present={} displacement={} level={:.1} label={}",
            self.ticks,
            sample.is_present(),
            displacement,
            self.level,
            self.status.label()
        );

        TickReport {
            sample,
            displacement,
            level: self.level,
            sensor_fault: false,
        }
    }

    /// Latest published snapshot
    pub fn status(&self) -> &SystemStatus {
        &self.status
    }

    /// Unclamped-precision level
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn tracking(&self) -> &TrackingState {
        &self.tracking
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn sensor_faults(&self) -> u64 {
        self.sensor_faults
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn into_sensor(self) -> S {
        self.sensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Centroid, MoodLabel};
    use moodspace_hal::ScriptedSensor;

    fn engine(positions: Vec<Option<(u16, u16)>>) -> ChaosEngine<ScriptedSensor> {
        ChaosEngine::new(ScriptedSensor::from_positions(positions), EngineParams::default())
    }

    #[test]
    fn test_worked_example() {
        let mut engine = engine(vec![Some((10, 10)), Some((14, 10)), None, Some((5, 5))]);

        let levels: Vec<f32> = (0..4).map(|_| engine.tick().level).collect();
        assert_eq!(levels, vec![0.0, 2.0, 0.5, 0.0]);
        assert_eq!(engine.status().label(), MoodLabel::Zen);
        assert_eq!((engine.status().object_x(), engine.status().object_y()), (5, 5));
    }

    #[test]
    fn test_dead_zone_is_inclusive() {
        let mut engine = engine(vec![]);
        engine.observe(Sample::Present(Centroid::new(0, 0)));
        let report = engine.observe(Sample::Present(Centroid::new(2, 1)));
        assert_eq!(report.displacement, 3);
        assert_eq!(report.level, 0.0);

        let report = engine.observe(Sample::Present(Centroid::new(6, 1)));
        assert_eq!(report.displacement, 4);
        assert_eq!(report.level, 2.0);
    }

    #[test]
    fn test_clamped_at_ceiling() {
        let mut engine = engine(vec![]);
        for i in 0..20u16 {
            let x = if i % 2 == 0 { 0 } else { 300 };
            engine.observe(Sample::Present(Centroid::new(x, 0)));
        }
        assert_eq!(engine.level(), 100.0);
        assert_eq!(engine.status().chaos_level(), 100);
        assert_eq!(engine.status().label(), MoodLabel::Chaotic);
    }

    #[test]
    fn test_oversized_ceiling_still_caps_at_hundred() {
        let params = EngineParams {
            ceiling: 250.0,
            ..EngineParams::default()
        };
        let mut engine = ChaosEngine::new(ScriptedSensor::new(), params);
        for i in 0..20u16 {
            let x = if i % 2 == 0 { 0 } else { 300 };
            engine.observe(Sample::Present(Centroid::new(x, 0)));
        }
        assert_eq!(engine.level(), 100.0);
        assert_eq!(engine.status().chaos_level(), 100);
    }

    #[test]
    fn test_fractional_level_uses_float_threshold() {
        let params = EngineParams {
            gain: 0.5,
            bands: crate::params::Bands {
                zen_below: 29.5,
                chaotic_from: 70.0,
            },
            ..EngineParams::default()
        };
        let mut engine = ChaosEngine::new(ScriptedSensor::new(), params);
        engine.observe(Sample::Present(Centroid::new(0, 0)));
        let report = engine.observe(Sample::Present(Centroid::new(59, 0)));

        assert_eq!(report.level, 29.5);
        assert_eq!(engine.status().chaos_level(), 29);
        assert_eq!(engine.status().label(), MoodLabel::Active);
    }

    #[test]
    fn test_decays_while_absent() {
        let mut engine = engine(vec![]);
        engine.observe(Sample::Present(Centroid::new(0, 0)));
        engine.observe(Sample::Present(Centroid::new(100, 0)));
        assert_eq!(engine.level(), 50.0);

        for _ in 0..4 {
            engine.observe(Sample::Absent);
        }
        assert_eq!(engine.level(), 44.0);
        assert!(!engine.tracking().is_tracking());
        // Last known position is still reported
        assert_eq!(engine.status().object_x(), 100);
    }

    #[test]
    fn test_truncates_level() {
        let mut engine = engine(vec![]);
        engine.observe(Sample::Present(Centroid::new(0, 0)));
        engine.observe(Sample::Present(Centroid::new(59, 0)));
        assert_eq!(engine.level(), 29.5);
        assert_eq!(engine.status().chaos_level(), 29);
        assert_eq!(engine.status().label(), MoodLabel::Zen);
    }

    #[test]
    fn test_reappearance_is_first_sighting() {
        let mut engine = engine(vec![Some((0, 0)), None, Some((300, 200))]);
        engine.tick();
        engine.tick();
        let report = engine.tick();
        assert_eq!(report.displacement, 0);
    }

    #[test]
    fn test_sensor_fault_counts_as_absent() {
        let mut sensor = ScriptedSensor::new();
        sensor.push_block(moodspace_hal::Block::at(10, 10)).push_fault().push_block(moodspace_hal::Block::at(50, 10));
        let mut engine = ChaosEngine::new(sensor, EngineParams::default());

        engine.tick();
        let report = engine.tick();
        assert!(report.sensor_fault);
        assert_eq!(report.sample, Sample::Absent);

        // Tracking was reset by the fault, so no jump is scored
        assert_eq!(engine.tick().displacement, 0);
        assert_eq!(engine.sensor_faults(), 1);
        assert_eq!(engine.ticks(), 3);
    }
}
