// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Recorded sessions played back as a sensor
//!
//! One frame per line (JSON lines). A frame is `null` (nothing detected), a
//! single object `{"x": 120, "y": 80}` or an array of objects. Blank lines
//! and lines starting with `#` are skipped.

use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::hal::{Block, BlockList, BlockSensor};

#[derive(Debug, Deserialize)]
struct ReplayObject {
    x: u16,
    y: u16,
    #[serde(default = "default_signature")]
    signature: u16,
    #[serde(default)]
    width: u16,
    #[serde(default)]
    height: u16,
}

fn default_signature() -> u16 {
    1
}

impl From<ReplayObject> for Block {
    fn from(object: ReplayObject) -> Self {
        Block {
            signature: object.signature,
            x: object.x,
            y: object.y,
            width: object.width,
            height: object.height,
            ..Block::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayFrame {
    Absent(()),
    One(ReplayObject),
    Many(Vec<ReplayObject>),
}

/// Errors loading a recording
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("recording contains no frames")]
    Empty,
}

/// Sensor that replays a recorded session, looping at the end
#[derive(Debug, Clone)]
pub struct ReplaySensor {
    frames: Vec<BlockList>,
    cursor: usize,
    looping: bool,
}

impl ReplaySensor {
    /// Load a JSON-lines recording from disk
    pub fn from_path(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse a JSON-lines recording
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        let mut frames = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let frame: ReplayFrame = serde_json::from_str(line).map_err(|source| ReplayError::Parse {
                line: number + 1,
                source,
            })?;
            let mut blocks = BlockList::new();
            match frame {
                ReplayFrame::Absent(()) => {}
                ReplayFrame::One(object) => {
                    let _ = blocks.push(object.into());
                }
                ReplayFrame::Many(objects) => {
                    for object in objects {
                        if blocks.push(object.into()).is_err() {
                            break;
                        }
                    }
                }
            }
            frames.push(blocks);
        }

        if frames.is_empty() {
            return Err(ReplayError::Empty);
        }
        Ok(Self {
            frames,
            cursor: 0,
            looping: true,
        })
    }

    /// Stop at the end of the recording instead of looping
    pub fn play_once(mut self) -> Self {
        self.looping = false;
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl BlockSensor for ReplaySensor {
    type Error = Infallible;

    fn get_blocks(&mut self) -> Result<BlockList, Self::Error> {
        if self.cursor >= self.frames.len() {
            if !self.looping {
                return Ok(BlockList::new());
            }
            self.cursor = 0;
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor += 1;
        Ok(frame)
    }
}
