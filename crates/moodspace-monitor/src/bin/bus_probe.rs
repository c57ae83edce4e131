// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! One-shot SPI diagnostic for the board (SPI2, mode 1, 1 MHz)
//!
//! Clocks out zero bytes and reports whether anything drives MISO.

use anyhow::{Context, Result};
use moodspace_hal::platforms::esp32::take_spi_probe;
use moodspace_hal::{probe_bus, BusVerdict, TimeProvider};
use moodspace_observability::{init_console_logging, parse_debug_flags};
use tracing::{info, warn};

/// Bytes exchanged per probe
const PROBE_LEN: usize = 16;

/// Probes taken, one second apart
const PROBE_ROUNDS: u32 = 3;

fn main() -> Result<()> {
    let _log_guard = init_console_logging(&parse_debug_flags(), "info")?;

    let (platform, mut device) = take_spi_probe()?;
    info!(target: "moodspace-monitor", "🔌 SPI bus probe: {} rounds of {} bytes", PROBE_ROUNDS, PROBE_LEN);

    let mut responding = 0;
    for round in 1..=PROBE_ROUNDS {
        let report = probe_bus(&mut device, PROBE_LEN)
            .map_err(|e| anyhow::anyhow!("SPI transfer failed: {:?}", e))
            .with_context(|| format!("probe round {}", round))?;
        info!(target: "moodspace-monitor", "Round {}: {}", round, report);
        if report.verdict == BusVerdict::Responding {
            responding += 1;
        }
        platform.delay_ms(1000);
    }

    if responding == 0 {
        warn!(target: "moodspace-monitor", "No device answered; check wiring (SCK 18, MOSI 23, MISO 19, CS 5)");
    } else {
        info!(target: "moodspace-monitor", "✓ Device responded in {}/{} rounds", responding, PROBE_ROUNDS);
    }
    Ok(())
}
