// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Pixy2 camera driver over I2C
//!
//! Implements the two packets the monitor needs from the Pixy2 serial
//! protocol: `getBlocks` (colour-connected-components results) and
//! `getVersion` (startup identity check). All multi-byte fields are
//! little-endian.
//!
//! ```text
//! request:  ae c1 <type> <len> <payload...>
//! response: af c1 <type> <len> <csum lo> <csum hi> <payload...>
//! ```

use embedded_hal::i2c::I2c;

use crate::hal::{Block, BlockList, BlockSensor, MAX_BLOCKS};

/// Default 7-bit I2C address of the camera
pub const DEFAULT_ADDRESS: u8 = 0x54;

pub mod protocol {
    //! Packet framing, independent of the bus

    use super::*;

    pub const SYNC_REQUEST: u16 = 0xc1ae;
    pub const SYNC_RESPONSE_CHECKSUM: u16 = 0xc1af;
    pub const HEADER_LEN: usize = 6;
    pub const BLOCK_LEN: usize = 14;
    pub const VERSION_LEN: usize = 16;

    pub const TYPE_RESPONSE_ERROR: u8 = 0x03;
    pub const TYPE_REQUEST_VERSION: u8 = 0x0e;
    pub const TYPE_RESPONSE_VERSION: u8 = 0x0f;
    pub const TYPE_REQUEST_BLOCKS: u8 = 0x20;
    pub const TYPE_RESPONSE_BLOCKS: u8 = 0x21;

    /// Device result code meaning "no new frame since the last request"
    pub const RESULT_BUSY: i8 = -2;

    /// Decoded response header
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Header {
        pub packet_type: u8,
        pub length: u8,
        pub checksum: u16,
    }

    /// Frame a request packet into `out`, returning the used prefix
    pub fn encode_request<'a>(packet_type: u8, payload: &[u8], out: &'a mut [u8]) -> &'a [u8] {
        let total = 4 + payload.len();
        let [lo, hi] = SYNC_REQUEST.to_le_bytes();
        out[0] = lo;
        out[1] = hi;
        out[2] = packet_type;
        out[3] = payload.len() as u8;
        out[4..total].copy_from_slice(payload);
        &out[..total]
    }

    /// Parse a checksummed response header; `Err(sync)` if the sync word is wrong
    pub fn parse_header(raw: &[u8; HEADER_LEN]) -> Result<Header, u16> {
        let sync = u16::from_le_bytes([raw[0], raw[1]]);
        if sync != SYNC_RESPONSE_CHECKSUM {
            return Err(sync);
        }
        Ok(Header {
            packet_type: raw[2],
            length: raw[3],
            checksum: u16::from_le_bytes([raw[4], raw[5]]),
        })
    }

    /// Sum of payload bytes, as the camera computes it
    pub fn checksum(payload: &[u8]) -> u16 {
        payload
            .iter()
            .fold(0u16, |acc, b| acc.wrapping_add(u16::from(*b)))
    }

    /// Decode one 14-byte block record
    pub fn decode_block(raw: &[u8]) -> Block {
        let word = |i: usize| u16::from_le_bytes([raw[i], raw[i + 1]]);
        Block {
            signature: word(0),
            x: word(2),
            y: word(4),
            width: word(6),
            height: word(8),
            angle: word(10) as i16,
            index: raw[12],
            age: raw[13],
        }
    }

    /// Decode a `getBlocks` payload; records beyond [`MAX_BLOCKS`] are dropped
    pub fn decode_blocks(payload: &[u8]) -> Result<BlockList, &'static str> {
        if payload.len() % BLOCK_LEN != 0 {
            return Err("block payload is not a multiple of 14 bytes");
        }
        let mut blocks = BlockList::new();
        for raw in payload.chunks_exact(BLOCK_LEN) {
            if blocks.push(decode_block(raw)).is_err() {
                break;
            }
        }
        Ok(blocks)
    }

    /// Encode a block record (used by tests and the replay tooling)
    pub fn encode_block(block: &Block, out: &mut [u8]) {
        out[0..2].copy_from_slice(&block.signature.to_le_bytes());
        out[2..4].copy_from_slice(&block.x.to_le_bytes());
        out[4..6].copy_from_slice(&block.y.to_le_bytes());
        out[6..8].copy_from_slice(&block.width.to_le_bytes());
        out[8..10].copy_from_slice(&block.height.to_le_bytes());
        out[10..12].copy_from_slice(&block.angle.to_le_bytes());
        out[12] = block.index;
        out[13] = block.age;
    }
}

/// Firmware identity reported by `getVersion`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixy2Version {
    pub hardware: u16,
    pub firmware_major: u8,
    pub firmware_minor: u8,
    pub firmware_build: u16,
    pub firmware_type: String,
}

impl core::fmt::Display for Pixy2Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "hw 0x{:04x}, fw {}.{}.{} ({})",
            self.hardware,
            self.firmware_major,
            self.firmware_minor,
            self.firmware_build,
            self.firmware_type
        )
    }
}

/// Pixy2 driver errors
#[derive(Debug, thiserror::Error)]
pub enum Pixy2Error<E: core::fmt::Debug> {
    #[error("I2C bus error: {0:?}")]
    Bus(E),

    #[error("bad sync word 0x{0:04x}")]
    BadSync(u16),

    #[error("checksum mismatch: header 0x{expected:04x}, payload 0x{actual:04x}")]
    Checksum { expected: u16, actual: u16 },

    #[error("unexpected packet type {actual:#04x} (expected {expected:#04x})")]
    UnexpectedType { expected: u8, actual: u8 },

    #[error("camera busy, no new frame")]
    Busy,

    #[error("camera reported error {0}")]
    Device(i8),

    #[error("malformed payload: {0}")]
    Malformed(&'static str),
}

/// Request parameters for `getBlocks`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixy2Config {
    pub address: u8,
    /// Bit n selects signature n+1
    pub signature_map: u8,
    pub max_blocks: u8,
}

impl Default for Pixy2Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            signature_map: 1,
            max_blocks: 1,
        }
    }
}

const PAYLOAD_CAPACITY: usize = protocol::BLOCK_LEN * MAX_BLOCKS;

/// Pixy2 camera on an I2C bus
pub struct Pixy2<I2C> {
    i2c: I2C,
    config: Pixy2Config,
    payload: [u8; PAYLOAD_CAPACITY],
}

impl<I2C> core::fmt::Debug for Pixy2<I2C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pixy2").field("config", &self.config).finish_non_exhaustive()
    }
}

impl<I2C: I2c> Pixy2<I2C> {
    /// Wrap an I2C bus; `max_blocks` is capped at [`MAX_BLOCKS`]
    pub fn new(i2c: I2C, mut config: Pixy2Config) -> Self {
        config.max_blocks = config.max_blocks.clamp(1, MAX_BLOCKS as u8);
        Self {
            i2c,
            config,
            payload: [0; PAYLOAD_CAPACITY],
        }
    }

    pub fn config(&self) -> &Pixy2Config {
        &self.config
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Query firmware identity
    pub fn version(&mut self) -> Result<Pixy2Version, Pixy2Error<I2C::Error>> {
        let len = self.exchange(protocol::TYPE_REQUEST_VERSION, &[], protocol::TYPE_RESPONSE_VERSION)?;
        if len < protocol::VERSION_LEN {
            return Err(Pixy2Error::Malformed("version payload too short"));
        }
        let p = &self.payload;
        let name_bytes = &p[6..16];
        let name_end = name_bytes.iter().position(|b| *b == 0).unwrap_or(name_bytes.len());
        Ok(Pixy2Version {
            hardware: u16::from_le_bytes([p[0], p[1]]),
            firmware_major: p[2],
            firmware_minor: p[3],
            firmware_build: u16::from_le_bytes([p[4], p[5]]),
            firmware_type: String::from_utf8_lossy(&name_bytes[..name_end]).into_owned(),
        })
    }

    /// Send one request and read the matching response into `self.payload`
    fn exchange(
        &mut self,
        request_type: u8,
        request_payload: &[u8],
        response_type: u8,
    ) -> Result<usize, Pixy2Error<I2C::Error>> {
        let mut request = [0u8; 8];
        let request = protocol::encode_request(request_type, request_payload, &mut request);
        self.i2c
            .write(self.config.address, request)
            .map_err(Pixy2Error::Bus)?;

        let mut raw_header = [0u8; protocol::HEADER_LEN];
        self.i2c
            .read(self.config.address, &mut raw_header)
            .map_err(Pixy2Error::Bus)?;
        let header = protocol::parse_header(&raw_header).map_err(Pixy2Error::BadSync)?;

        let len = usize::from(header.length);
        if len > PAYLOAD_CAPACITY {
            return Err(Pixy2Error::Malformed("payload larger than requested"));
        }
        if len > 0 {
            self.i2c
                .read(self.config.address, &mut self.payload[..len])
                .map_err(Pixy2Error::Bus)?;
        }

        let actual = protocol::checksum(&self.payload[..len]);
        if actual != header.checksum {
            return Err(Pixy2Error::Checksum {
                expected: header.checksum,
                actual,
            });
        }

        if header.packet_type == protocol::TYPE_RESPONSE_ERROR {
            let code = if len > 0 { self.payload[0] as i8 } else { -1 };
            return Err(if code == protocol::RESULT_BUSY {
                Pixy2Error::Busy
            } else {
                Pixy2Error::Device(code)
            });
        }
        if header.packet_type != response_type {
            return Err(Pixy2Error::UnexpectedType {
                expected: response_type,
                actual: header.packet_type,
            });
        }

        Ok(len)
    }
}

impl<I2C: I2c> BlockSensor for Pixy2<I2C> {
    type Error = Pixy2Error<I2C::Error>;

    fn get_blocks(&mut self) -> Result<BlockList, Self::Error> {
        let request = [self.config.signature_map, self.config.max_blocks];
        let len = self.exchange(
            protocol::TYPE_REQUEST_BLOCKS,
            &request,
            protocol::TYPE_RESPONSE_BLOCKS,
        )?;
        protocol::decode_blocks(&self.payload[..len]).map_err(Pixy2Error::Malformed)
    }
}
