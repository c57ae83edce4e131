// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, MoodSpaceConfig, SensorSource};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "moodspace_configuration.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "MOODSPACE_CONFIG_PATH";

/// Find the MoodSpace configuration file
///
/// Search order:
/// 1. `MOODSPACE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./moodspace_configuration.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Validation is a separate step, see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<MoodSpaceConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: MoodSpaceConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Like [`load_config`], but start from defaults when no file is found
///
/// An explicit `config_path` that does not exist is still an error.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<MoodSpaceConfig> {
    match config_path {
        Some(path) => load_config(Some(path), cli_args),
        None => match find_config_file() {
            Ok(path) => load_config(Some(&path), cli_args),
            Err(ConfigError::FileNotFound(_)) => {
                let mut config = MoodSpaceConfig::default();
                apply_environment_overrides(&mut config);
                if let Some(cli) = cli_args {
                    apply_cli_overrides(&mut config, cli)?;
                }
                Ok(config)
            }
            Err(e) => Err(e),
        },
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `MOODSPACE_SERVER_HOST` -> `server.host`
/// - `MOODSPACE_SERVER_PORT` -> `server.port`
/// - `MOODSPACE_WIFI_SSID` -> `network.ssid`
/// - `MOODSPACE_WIFI_PASSWORD` -> `network.password`
/// - `MOODSPACE_LOG_LEVEL` -> `logging.level`
/// - `MOODSPACE_LOOP_PAUSE_MS` -> `runtime.loop_pause_ms`
/// - `MOODSPACE_SENSOR_SOURCE` -> `sensor.source`
/// - `MOODSPACE_REPLAY_PATH` -> `sensor.replay_path`
///
/// Values that fail to parse are ignored and the file value is kept.
pub fn apply_environment_overrides(config: &mut MoodSpaceConfig) {
    if let Ok(value) = env::var("MOODSPACE_SERVER_HOST") {
        config.server.host = value;
    }
    if let Ok(value) = env::var("MOODSPACE_SERVER_PORT") {
        if let Ok(port) = value.parse::<u16>() {
            config.server.port = port;
        }
    }
    if let Ok(value) = env::var("MOODSPACE_WIFI_SSID") {
        config.network.ssid = value;
    }
    if let Ok(value) = env::var("MOODSPACE_WIFI_PASSWORD") {
        config.network.password = value;
    }
    if let Ok(value) = env::var("MOODSPACE_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("MOODSPACE_LOOP_PAUSE_MS") {
        if let Ok(pause) = value.parse::<u64>() {
            config.runtime.loop_pause_ms = pause;
        }
    }
    if let Ok(value) = env::var("MOODSPACE_SENSOR_SOURCE") {
        if let Ok(source) = value.parse::<SensorSource>() {
            config.sensor.source = source;
        }
    }
    if let Ok(value) = env::var("MOODSPACE_REPLAY_PATH") {
        config.sensor.replay_path = Some(PathBuf::from(value));
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"server_port": "8080"}`)
///
/// # Errors
///
/// Unlike environment overrides, an explicit CLI value that cannot be parsed
/// is reported as `ConfigError::InvalidValue`.
pub fn apply_cli_overrides(
    config: &mut MoodSpaceConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("server_host") {
        config.server.host = value.clone();
    }
    if let Some(value) = cli_args.get("server_port") {
        config.server.port = value
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue(format!("server_port '{}'", value)))?;
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("loop_pause_ms") {
        config.runtime.loop_pause_ms = value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue(format!("loop_pause_ms '{}'", value)))?;
    }
    if let Some(value) = cli_args.get("sensor_source") {
        config.sensor.source = value.parse::<SensorSource>()?;
    }
    if let Some(value) = cli_args.get("replay_path") {
        config.sensor.replay_path = Some(PathBuf::from(value));
    }
    Ok(())
}
