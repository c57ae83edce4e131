// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! SPI bus probe
//!
//! Clocks out zero bytes and looks at what comes back. A floating MISO line
//! reads as all `0xFF` (pull-up) or all `0x00`; anything varied means a
//! device is driving the line.

use std::fmt;

use embedded_hal::spi::SpiDevice;
use tracing::{debug, info};

/// Classification of a probe reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusVerdict {
    /// Every byte `0x00` or every byte `0xFF`
    Silent,
    /// Bytes differ
    Responding,
    /// Every byte the same value, neither `0x00` nor `0xFF`
    Inconclusive,
}

impl BusVerdict {
    /// Classify a reply buffer
    pub fn classify(reply: &[u8]) -> Self {
        match reply.split_first() {
            None => BusVerdict::Silent,
            Some((first, rest)) if rest.iter().all(|b| b == first) => match first {
                0x00 | 0xFF => BusVerdict::Silent,
                _ => BusVerdict::Inconclusive,
            },
            Some(_) => BusVerdict::Responding,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BusVerdict::Silent => "silent",
            BusVerdict::Responding => "responding",
            BusVerdict::Inconclusive => "inconclusive",
        }
    }
}

impl fmt::Display for BusVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusProbeReport {
    pub reply: Vec<u8>,
    pub verdict: BusVerdict,
}

impl fmt::Display for BusProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.verdict)?;
        for (i, byte) in self.reply.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        f.write_str("]")
    }
}

/// Exchange `len` zero bytes with the device and classify the reply
pub fn probe_bus<D: SpiDevice>(device: &mut D, len: usize) -> Result<BusProbeReport, D::Error> {
    let mut buffer = vec![0u8; len];
    device.transfer_in_place(&mut buffer)?;

    let verdict = BusVerdict::classify(&buffer);
    debug!(target: "moodspace-hal", "SPI probe reply: {:02x?}", buffer);
    info!(target: "moodspace-hal", "SPI bus {}", verdict);

    Ok(BusProbeReport {
        reply: buffer,
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(BusVerdict::classify(&[0x00; 8]), BusVerdict::Silent);
        assert_eq!(BusVerdict::classify(&[0xFF; 8]), BusVerdict::Silent);
        assert_eq!(BusVerdict::classify(&[0x5A; 8]), BusVerdict::Inconclusive);
        assert_eq!(BusVerdict::classify(&[0x00, 0x01, 0x00]), BusVerdict::Responding);
        assert_eq!(BusVerdict::classify(&[]), BusVerdict::Silent);
    }

    #[test]
    fn test_report_display() {
        let report = BusProbeReport {
            reply: vec![0xaf, 0x01],
            verdict: BusVerdict::Responding,
        };
        assert_eq!(report.to_string(), "responding [af 01]");
    }
}
