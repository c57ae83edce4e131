// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use moodspace_api::{DispatcherConfig, RequestDispatcher};
use moodspace_config::{load_config_or_default, validate_config, MoodSpaceConfig, NetworkConfig};
use moodspace_engine::{ChaosEngine, EngineParams};
use moodspace_hal::{join_network, BlockSensor, NetworkLink, TimeProvider, WifiCredentials};
use moodspace_monitor::MonitorLoop;
use moodspace_observability::{debug_flags_help, init_logging, parse_debug_flags};
use tracing::{error, info};

/// MoodSpace Monitor - room agitation from a vision sensor, served over HTTP
#[derive(Parser, Debug)]
#[command(name = "moodspace-monitor", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to moodspace_configuration.toml (searched for when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP port (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// Sensor source: simulated, replay or pixy2
    #[arg(long)]
    sensor: Option<String>,

    /// JSON-lines recording to replay (implies --sensor replay)
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Pause between loop iterations in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Do not wait for the network link before serving
    #[arg(long, default_value_t = false)]
    skip_network: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    /// Map flags onto the configuration loader's override keys
    fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(host) = &self.host {
            overrides.insert("server_host".to_string(), host.clone());
        }
        if let Some(port) = self.port {
            overrides.insert("server_port".to_string(), port.to_string());
        }
        if let Some(pause) = self.pause_ms {
            overrides.insert("loop_pause_ms".to_string(), pause.to_string());
        }
        if let Some(replay) = &self.replay {
            overrides.insert("replay_path".to_string(), replay.display().to_string());
            overrides.insert("sensor_source".to_string(), "replay".to_string());
        }
        if let Some(sensor) = &self.sensor {
            overrides.insert("sensor_source".to_string(), sensor.clone());
        }
        if self.verbose {
            overrides.insert("log_level".to_string(), "debug".to_string());
        }
        overrides
    }
}

fn main() -> Result<()> {
    // `--debug-<crate>` flags belong to the logging layer, not to clap
    let args = Args::parse_from(env::args().filter(|arg| !arg.starts_with("--debug-")));
    let debug_flags = parse_debug_flags();

    #[allow(unused_mut)]
    let mut config = load_config_or_default(args.config.as_deref(), Some(&args.config_overrides()))
        .context("Failed to load configuration")?;

    #[cfg(feature = "esp32")]
    apply_build_time_credentials(&mut config.network);

    validate_config(&config)?;

    let _log_guard = init_logging(&debug_flags, &config.logging)?;

    print_banner();

    if let Err(e) = run(&args, &config) {
        error!(target: "moodspace-monitor", "❌ {:#}", e);
        return Err(e);
    }
    Ok(())
}

fn print_banner() {
    info!(target: "moodspace-monitor", "╔══════════════════════════════════════╗");
    info!(target: "moodspace-monitor", "║        MoodSpace Kinetic v{:<10} ║", env!("CARGO_PKG_VERSION"));
    info!(target: "moodspace-monitor", "╚══════════════════════════════════════╝");
}

#[cfg(not(feature = "esp32"))]
fn run(args: &Args, config: &MoodSpaceConfig) -> Result<()> {
    use moodspace_hal::{HostNetwork, HostPlatform, Platform};
    use moodspace_monitor::open_sensor;

    let platform = HostPlatform::new();
    info!(target: "moodspace-monitor", "Platform: {}", platform.name());

    let address = if args.skip_network {
        info!(target: "moodspace-monitor", "Skipping network bootstrap");
        None
    } else {
        Some(bootstrap(&mut HostNetwork::new(), &config.network, &platform)?)
    };

    let sensor = open_sensor(&config.sensor)?;
    serve(sensor, platform, address, config)
}

#[cfg(feature = "esp32")]
fn run(args: &Args, config: &MoodSpaceConfig) -> Result<()> {
    use moodspace_config::SensorSource;
    use moodspace_hal::{Esp32Board, Pixy2Config, Platform};
    use moodspace_monitor::{open_sensor, SelectedSensor};
    use tracing::warn;

    let pixy_config = Pixy2Config {
        address: config.sensor.i2c_address,
        signature_map: config.sensor.signature_map,
        max_blocks: config.sensor.max_blocks,
    };
    let Esp32Board {
        platform,
        mut wifi,
        mut pixy,
    } = Esp32Board::take(config.sensor.i2c_frequency_hz, pixy_config)?;
    info!(
        target: "moodspace-monitor",
        "Platform: {} ({} bytes free)",
        platform.name(),
        platform.free_heap_bytes()
    );

    let address = if args.skip_network {
        None
    } else {
        Some(bootstrap(&mut wifi, &config.network, &platform)?)
    };

    let sensor = match config.sensor.source {
        SensorSource::Pixy2 => {
            match pixy.version() {
                Ok(version) => info!(target: "moodspace-monitor", "✓ Pixy2 found: {}", version),
                Err(e) => warn!(target: "moodspace-monitor", "Pixy2 did not answer getVersion: {}", e),
            }
            SelectedSensor::Pixy2(pixy)
        }
        _ => open_sensor(&config.sensor)?,
    };

    // `wifi` must outlive the loop or the link goes down
    let result = serve(sensor, platform, address, config);
    drop(wifi);
    result
}

/// Values baked in at build time, used when the config leaves them empty
#[cfg(feature = "esp32")]
fn apply_build_time_credentials(network: &mut NetworkConfig) {
    if network.ssid.is_empty() {
        if let Some(ssid) = option_env!("MOODSPACE_WIFI_SSID") {
            network.ssid = ssid.to_string();
        }
    }
    if network.password.is_empty() {
        if let Some(password) = option_env!("MOODSPACE_WIFI_PASSWORD") {
            network.password = password.to_string();
        }
    }
}

/// Join the network under the single strict policy; failure aborts startup
fn bootstrap<L, T>(link: &mut L, network: &NetworkConfig, clock: &T) -> Result<IpAddr>
where
    L: NetworkLink,
    T: TimeProvider,
{
    let credentials =
        WifiCredentials::new(&network.ssid, &network.password).with_hostname(&network.hostname);
    let address = join_network(
        link,
        &credentials,
        Duration::from_secs(network.connect_timeout_s),
        Duration::from_millis(network.poll_interval_ms),
        clock,
    )
    .context("Network bootstrap failed")?;
    info!(target: "moodspace-monitor", "✓ Network up: {}", address);
    Ok(address)
}

fn serve<S, T>(sensor: S, clock: T, address: Option<IpAddr>, config: &MoodSpaceConfig) -> Result<()>
where
    S: BlockSensor,
    T: TimeProvider,
{
    let engine = ChaosEngine::new(sensor, EngineParams::from(&config.engine));

    let mut dispatcher = RequestDispatcher::new(DispatcherConfig::from(&config.server));
    let bound = dispatcher.start().context("Failed to start request dispatcher")?;

    let host = match address {
        Some(address) => address.to_string(),
        None if bound.ip().is_unspecified() => "localhost".to_string(),
        None => bound.ip().to_string(),
    };
    info!(target: "moodspace-monitor", "🌐 Monitor page: http://{}:{}/", host, bound.port());

    let running = Arc::new(AtomicBool::new(true));
    install_shutdown_handler(Arc::clone(&running))?;

    let pause = Duration::from_millis(config.runtime.loop_pause_ms);
    let mut monitor = MonitorLoop::new(engine, dispatcher, clock, pause);

    info!(
        target: "moodspace-monitor",
        "🚀 Monitoring ({} ms pause, press Ctrl+C to stop)...",
        pause.as_millis()
    );
    let iterations = monitor.run(&running);

    monitor.dispatcher_mut().stop();
    info!(
        target: "moodspace-monitor",
        "✅ Stopped after {} iterations: {} requests served, {} failed, {} sensor faults",
        iterations,
        monitor.dispatcher().served(),
        monitor.dispatcher().failed(),
        monitor.engine().sensor_faults()
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn install_shutdown_handler(running: Arc<AtomicBool>) -> Result<()> {
    use std::sync::atomic::Ordering;

    ctrlc::set_handler(move || {
        info!(target: "moodspace-monitor", "Shutdown signal received...");
        running.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl-C handler")
}

// The board runs until power-off
#[cfg(target_os = "espidf")]
fn install_shutdown_handler(_running: Arc<AtomicBool>) -> Result<()> {
    Ok(())
}
