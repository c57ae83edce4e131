// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem in one pass so a misconfigured board reports all of
//! them at once instead of one per flash cycle.

use crate::{ConfigError, ConfigResult, MoodSpaceConfig, SensorSource};

/// Longest SSID accepted by 802.11
const MAX_SSID_BYTES: usize = 32;

/// The published level is a percentage
const MAX_CEILING: f32 = 100.0;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

fn invalid(field: &str, reason: &str) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &MoodSpaceConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Run every check and return the failures
pub fn collect_errors(config: &MoodSpaceConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_network(config, &mut errors);
    validate_server(config, &mut errors);
    validate_engine(config, &mut errors);
    validate_sensor(config, &mut errors);
    validate_runtime(config, &mut errors);
    errors
}

fn validate_network(config: &MoodSpaceConfig, errors: &mut Vec<ConfigValidationError>) {
    let network = &config.network;

    if network.ssid.len() > MAX_SSID_BYTES {
        errors.push(invalid("network.ssid", "must be at most 32 bytes"));
    }

    // WPA2-PSK passphrases are 8..=63 characters; empty means an open network
    let password_len = network.password.len();
    if password_len != 0 && !(8..=63).contains(&password_len) {
        errors.push(invalid(
            "network.password",
            "must be empty (open network) or 8-63 characters",
        ));
    }

    if network.connect_timeout_s == 0 {
        errors.push(invalid("network.connect_timeout_s", "must be positive"));
    }
    if network.poll_interval_ms == 0 {
        errors.push(invalid("network.poll_interval_ms", "must be positive"));
    } else if network.poll_interval_ms > network.connect_timeout_s.saturating_mul(1000) {
        errors.push(invalid(
            "network.poll_interval_ms",
            "must not exceed network.connect_timeout_s",
        ));
    }
}

fn validate_server(config: &MoodSpaceConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.server.host.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "server.host".to_string(),
        });
    }
    if config.server.port == 0 {
        errors.push(invalid("server.port", "must be between 1 and 65535"));
    }
    if config.server.read_chunk_bytes == 0 {
        errors.push(invalid("server.read_chunk_bytes", "must be positive"));
    }
    if config.server.client_io_timeout_ms == 0 {
        errors.push(invalid("server.client_io_timeout_ms", "must be positive"));
    }
}

fn validate_engine(config: &MoodSpaceConfig, errors: &mut Vec<ConfigValidationError>) {
    let engine = &config.engine;

    if !(engine.motion_gain > 0.0) {
        errors.push(invalid("engine.motion_gain", "must be positive"));
    }
    if !(engine.decay_per_tick > 0.0) {
        errors.push(invalid("engine.decay_per_tick", "must be positive"));
    }
    let ordered = 0.0 < engine.zen_below
        && engine.zen_below < engine.chaotic_from
        && engine.chaotic_from <= engine.ceiling;
    if !ordered {
        errors.push(invalid(
            "engine.zen_below/chaotic_from/ceiling",
            "must satisfy 0 < zen_below < chaotic_from <= ceiling",
        ));
    }
    if engine.ceiling > MAX_CEILING {
        errors.push(invalid("engine.ceiling", "must not exceed 100"));
    }
    // Whole-number thresholds keep the label consistent with the published
    // integer level
    for (field, value) in [
        ("engine.zen_below", engine.zen_below),
        ("engine.chaotic_from", engine.chaotic_from),
    ] {
        if value.fract() != 0.0 {
            errors.push(invalid(field, "must be a whole number"));
        }
    }
}

fn validate_sensor(config: &MoodSpaceConfig, errors: &mut Vec<ConfigValidationError>) {
    let sensor = &config.sensor;

    if sensor.source == SensorSource::Replay && sensor.replay_path.is_none() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "sensor.replay_path".to_string(),
        });
    }
    if sensor.max_blocks == 0 {
        errors.push(invalid("sensor.max_blocks", "must be at least 1"));
    }
    if sensor.signature_map == 0 {
        errors.push(invalid("sensor.signature_map", "must select at least one signature"));
    }
    if sensor.i2c_address > 0x7f {
        errors.push(invalid("sensor.i2c_address", "must be a 7-bit address"));
    }
}

fn validate_runtime(config: &MoodSpaceConfig, errors: &mut Vec<ConfigValidationError>) {
    if !(1..=1000).contains(&config.runtime.loop_pause_ms) {
        errors.push(invalid("runtime.loop_pause_ms", "must be between 1 and 1000"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let config = MoodSpaceConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = MoodSpaceConfig::default();
        config.server.port = 0;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("server.port")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_band_ordering() {
        let mut config = MoodSpaceConfig::default();
        config.engine.zen_below = 80.0;

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("zen_below"));
    }

    #[test]
    fn test_short_password_rejected() {
        let mut config = MoodSpaceConfig::default();
        config.network.password = "short".to_string();
        assert!(collect_errors(&config)
            .iter()
            .any(|e| e.to_string().contains("network.password")));

        config.network.password = "long-enough".to_string();
        assert!(collect_errors(&config).is_empty());
    }

    #[test]
    fn test_replay_requires_path() {
        let mut config = MoodSpaceConfig::default();
        config.sensor.source = SensorSource::Replay;
        assert_eq!(
            collect_errors(&config),
            vec![ConfigValidationError::MissingRequired {
                field: "sensor.replay_path".to_string()
            }]
        );

        config.sensor.replay_path = Some(PathBuf::from("recording.jsonl"));
        assert!(collect_errors(&config).is_empty());
    }

    #[test]
    fn test_ceiling_capped_at_hundred() {
        let mut config = MoodSpaceConfig::default();
        config.engine.ceiling = 250.0;

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("engine.ceiling"));

        config.engine.ceiling = 80.0;
        assert!(collect_errors(&config).is_empty());
    }

    #[test]
    fn test_fractional_bands_rejected() {
        let mut config = MoodSpaceConfig::default();
        config.engine.zen_below = 29.5;

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("engine.zen_below"));

        config.engine.zen_below = 29.0;
        config.engine.chaotic_from = 69.99;
        assert!(collect_errors(&config)[0].to_string().contains("engine.chaotic_from"));
    }

    #[test]
    fn test_huge_connect_timeout_does_not_overflow() {
        let mut config = MoodSpaceConfig::default();
        config.network.connect_timeout_s = u64::MAX;
        assert!(collect_errors(&config).is_empty());
    }

    #[test]
    fn test_all_errors_reported_together() {
        let mut config = MoodSpaceConfig::default();
        config.runtime.loop_pause_ms = 0;
        config.engine.decay_per_tick = 0.0;
        config.server.read_chunk_bytes = 0;
        config.network.poll_interval_ms = 60_000;
        config.server.client_io_timeout_ms = 0;

        assert_eq!(collect_errors(&config).len(), 5);
    }
}
