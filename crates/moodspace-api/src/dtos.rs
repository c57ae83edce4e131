// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use moodspace_engine::SystemStatus;
use serde::Serialize;

/// Wire form of [`SystemStatus`] served at `/data`
///
/// Key names are fixed by the monitor page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDto {
    /// Chaos level, 0..=100
    pub caos: u32,
    /// `Zen`, `Active` or `Chaotic`
    pub etiqueta: &'static str,
    pub x: u16,
    pub y: u16,
}

impl From<&SystemStatus> for StatusDto {
    fn from(status: &SystemStatus) -> Self {
        Self {
            caos: status.chaos_level(),
            etiqueta: status.label().as_str(),
            x: status.object_x(),
            y: status.object_y(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let status = SystemStatus::new(42, 120, 80);
        let json = serde_json::to_string(&StatusDto::from(&status)).unwrap();
        assert_eq!(json, r#"{"caos":42,"etiqueta":"Active","x":120,"y":80}"#);
    }
}
