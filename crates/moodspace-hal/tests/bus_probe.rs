// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Bus probe against a mock SPI device

use std::convert::Infallible;

use embedded_hal::spi::{ErrorType, Operation, SpiDevice};
use moodspace_hal::{probe_bus, BusVerdict};

/// Replies with a fixed byte pattern, repeated as needed
struct PatternDevice {
    pattern: Vec<u8>,
    clocked_out: Vec<u8>,
}

impl PatternDevice {
    fn new(pattern: &[u8]) -> Self {
        Self {
            pattern: pattern.to_vec(),
            clocked_out: Vec::new(),
        }
    }
}

impl ErrorType for PatternDevice {
    type Error = Infallible;
}

impl SpiDevice for PatternDevice {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for operation in operations {
            if let Operation::TransferInPlace(buffer) = operation {
                self.clocked_out.extend_from_slice(buffer);
                for (i, byte) in buffer.iter_mut().enumerate() {
                    *byte = self.pattern[i % self.pattern.len()];
                }
            }
        }
        Ok(())
    }
}

#[test]
fn test_floating_line_is_silent() {
    let mut device = PatternDevice::new(&[0xff]);
    let report = probe_bus(&mut device, 16).unwrap();
    assert_eq!(report.verdict, BusVerdict::Silent);
    assert_eq!(report.reply.len(), 16);
    assert_eq!(device.clocked_out, vec![0u8; 16]);

    let mut device = PatternDevice::new(&[0x00]);
    assert_eq!(probe_bus(&mut device, 16).unwrap().verdict, BusVerdict::Silent);
}

#[test]
fn test_varied_reply_is_responding() {
    let mut device = PatternDevice::new(&[0xaf, 0xc1, 0x21, 0x00]);
    let report = probe_bus(&mut device, 8).unwrap();
    assert_eq!(report.verdict, BusVerdict::Responding);
    assert_eq!(&report.reply[..4], &[0xaf, 0xc1, 0x21, 0x00]);
}

#[test]
fn test_stuck_value_is_inconclusive() {
    let mut device = PatternDevice::new(&[0x80]);
    assert_eq!(probe_bus(&mut device, 8).unwrap().verdict, BusVerdict::Inconclusive);
}
