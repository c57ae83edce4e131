// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! # moodspace-observability
//!
//! Logging infrastructure shared by every MoodSpace crate, with per-crate
//! debug flag support.
//!
//! Every crate logs through `tracing` with `target: "<crate-name>"`, so a
//! single `--debug-moodspace-engine` flag turns on the per-tick trace without
//! flooding the console with dispatcher output.
//!
//! ## Features
//! - `file-logging`: timestamped run folders with rolling JSON logs (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Tracing target for this crate's own messages
pub const LOG_TARGET: &str = "moodspace-observability";

/// Known MoodSpace crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "moodspace-config",
    "moodspace-observability",
    "moodspace-hal",
    "moodspace-engine",
    "moodspace-api",
    "moodspace-monitor",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_target_is_a_known_crate() {
        assert!(KNOWN_CRATES.contains(&LOG_TARGET));
        assert_eq!(LOG_TARGET, env!("CARGO_PKG_NAME"));
    }
}
