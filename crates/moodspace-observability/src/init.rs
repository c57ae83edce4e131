// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for MoodSpace
//!
//! Console output is always on. With the `file-logging` feature and
//! `logging.file_logging = true`, a timestamped run folder receives a
//! daily-rolling JSON log and old runs are pruned by age and count.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use moodspace_config::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps background log writers alive; drop it last
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Build the filter applied to console output
pub fn build_env_filter(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<EnvFilter> {
    let filter = debug_flags.to_filter_string(default_level);
    EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
}

/// Initialize console logging, plus file logging when configured
///
/// # Errors
/// Fails if the level string is not a valid filter, the log directory cannot
/// be created, or a global subscriber is already installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let env_filter = build_env_filter(debug_flags, &config.level)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter)
        .boxed();
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let guard = {
        let mut file_guards = Vec::new();
        let mut log_dir = None;
        if config.file_logging {
            let (layer, worker_guard, run_folder) = file_layer(debug_flags, config)?;
            layers.push(layer);
            file_guards.push(worker_guard);
            log_dir = Some(run_folder);
        }
        LoggingGuard {
            _file_guards: file_guards,
            log_dir,
        }
    };

    #[cfg(not(feature = "file-logging"))]
    let guard = LoggingGuard { log_dir: None };

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    #[cfg(not(feature = "file-logging"))]
    if config.file_logging {
        tracing::warn!(
            target: crate::LOG_TARGET,
            "logging.file_logging is set but this build lacks the file-logging feature; console only"
        );
    }

    Ok(guard)
}

/// Console-only logging at `default_level`, for tools without a config file
pub fn init_console_logging(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<LoggingGuard> {
    let config = LoggingConfig {
        level: default_level.to_string(),
        file_logging: false,
        ..LoggingConfig::default()
    };
    init_logging(debug_flags, &config)
}

#[cfg(feature = "file-logging")]
fn file_layer(
    debug_flags: &CrateDebugFlags,
    config: &LoggingConfig,
) -> Result<(BoxedLayer, tracing_appender::non_blocking::WorkerGuard, PathBuf)> {
    use chrono::Utc;
    use tracing_appender::rolling;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = config.log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_logs(&config.log_dir, config.retention_days, config.retention_runs)?;

    let appender = rolling::daily(&run_folder, "moodspace.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(build_env_filter(debug_flags, &config.level)?)
        .boxed();

    Ok((layer, guard, run_folder))
}

/// Remove run folders older than `retention_days`, then keep only the
/// newest `retention_runs`
#[cfg(feature = "file-logging")]
pub fn cleanup_old_logs(base_log_dir: &Path, retention_days: u64, retention_runs: usize) -> Result<()> {
    use chrono::{NaiveDateTime, Utc};

    if !base_log_dir.exists() {
        return Ok(());
    }

    let cutoff = Utc::now().naive_utc() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, NaiveDateTime)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("run_"))
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y%m%d_%H%M%S").ok());
        if let Some(stamp) = stamp {
            runs.push((path, stamp));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, stamp)| *stamp);

    let (expired, kept): (Vec<_>, Vec<_>) = runs.into_iter().partition(|(_, stamp)| *stamp < cutoff);
    let excess = kept.len().saturating_sub(retention_runs);

    for (path, _) in expired.iter().chain(kept.iter().take(excess)) {
        if let Err(e) = std::fs::remove_dir_all(path) {
            eprintln!("Warning: Failed to remove old log directory {}: {}", path.display(), e);
        }
    }

    Ok(())
}
