// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use moodspace_api::{DispatchOutcome, RequestDispatcher};
use moodspace_engine::{ChaosEngine, TickReport};
use moodspace_hal::{BlockSensor, TimeProvider};
use tracing::info;

/// Iterations between periodic status lines (about 10 s at the default pause)
const STATUS_LOG_EVERY: u64 = 200;

/// What one pass through the loop did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    pub tick: TickReport,
    pub dispatch: DispatchOutcome,
    /// Time spent ticking and dispatching, excluding the pause
    pub busy_us: u64,
}

/// Engine, dispatcher and clock driven in strict alternation
#[derive(Debug)]
pub struct MonitorLoop<S: BlockSensor, T: TimeProvider> {
    engine: ChaosEngine<S>,
    dispatcher: RequestDispatcher,
    clock: T,
    pause: Duration,
    iterations: u64,
}

impl<S: BlockSensor, T: TimeProvider> MonitorLoop<S, T> {
    pub fn new(engine: ChaosEngine<S>, dispatcher: RequestDispatcher, clock: T, pause: Duration) -> Self {
        Self {
            engine,
            dispatcher,
            clock,
            pause,
            iterations: 0,
        }
    }

    /// Tick, serve at most one request with the fresh status, then pause
    pub fn run_iteration(&mut self) -> IterationReport {
        let started_us = self.clock.get_time_us();

        let tick = self.engine.tick();
        let dispatch = self.dispatcher.poll_once(self.engine.status());

        let busy_us = self.clock.get_time_us().saturating_sub(started_us);
        self.iterations += 1;

        if self.iterations % STATUS_LOG_EVERY == 0 {
            let status = self.engine.status();
            info!(
                target: "moodspace-monitor",
                "📊 chaos {} ({}) at ({}, {}), {} served, {} failed",
                status.chaos_level(),
                status.label(),
                status.object_x(),
                status.object_y(),
                self.dispatcher.served(),
                self.dispatcher.failed()
            );
        }

        let pause_ms = u32::try_from(self.pause.as_millis()).unwrap_or(u32::MAX);
        if pause_ms > 0 {
            self.clock.delay_ms(pause_ms);
        }

        IterationReport {
            tick,
            dispatch,
            busy_us,
        }
    }

    /// Loop until `running` is cleared; returns the iterations completed
    pub fn run(&mut self, running: &AtomicBool) -> u64 {
        let start = self.iterations;
        while running.load(Ordering::Relaxed) {
            self.run_iteration();
        }
        self.iterations - start
    }

    pub fn engine(&self) -> &ChaosEngine<S> {
        &self.engine
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut RequestDispatcher {
        &mut self.dispatcher
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodspace_api::DispatcherConfig;
    use moodspace_engine::EngineParams;
    use moodspace_hal::{HostPlatform, ScriptedSensor};

    fn monitor(positions: Vec<Option<(u16, u16)>>) -> MonitorLoop<ScriptedSensor, HostPlatform> {
        let engine = ChaosEngine::new(ScriptedSensor::from_positions(positions), EngineParams::default());
        let dispatcher = RequestDispatcher::new(DispatcherConfig::new("127.0.0.1:0"));
        MonitorLoop::new(engine, dispatcher, HostPlatform::new(), Duration::from_millis(1))
    }

    #[test]
    fn test_iteration_ticks_then_polls() {
        let mut monitor = monitor(vec![Some((10, 10)), Some((14, 10))]);
        monitor.dispatcher_mut().start().unwrap();

        let first = monitor.run_iteration();
        let second = monitor.run_iteration();

        assert_eq!(first.dispatch, DispatchOutcome::NoConnection);
        assert_eq!(second.tick.displacement, 4);
        assert_eq!(monitor.engine().level(), 2.0);
        assert_eq!(monitor.iterations(), 2);
    }

    #[test]
    fn test_run_stops_when_flag_cleared() {
        let mut monitor = monitor(vec![]);
        let running = AtomicBool::new(false);
        assert_eq!(monitor.run(&running), 0);
    }
}
