// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Desktop platform: std clock and the operating system's network stack

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::hal::{NetworkLink, Platform, TimeProvider, WifiCredentials};

/// Host platform backed by `std::time`
#[derive(Debug, Clone, Copy)]
pub struct HostPlatform {
    boot: Instant,
}

impl HostPlatform {
    pub fn new() -> Self {
        Self { boot: Instant::now() }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for HostPlatform {
    fn get_time_us(&self) -> u64 {
        self.boot.elapsed().as_micros() as u64
    }

    fn delay_us(&self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }
}

impl Platform for HostPlatform {
    fn name(&self) -> &'static str {
        "host"
    }
}

/// Documentation-range address; a UDP connect only consults the routing table
const DEFAULT_ROUTE_PROBE: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), 80);

/// Network link for a machine whose OS already manages the interface
///
/// Joining is a no-op. The link counts as connected once the routing table
/// yields a non-loopback address for outbound traffic.
#[derive(Debug, Clone)]
pub struct HostNetwork {
    probe_target: SocketAddr,
    loopback_only: bool,
}

impl HostNetwork {
    pub fn new() -> Self {
        Self {
            probe_target: DEFAULT_ROUTE_PROBE,
            loopback_only: false,
        }
    }

    /// Link that always reports `127.0.0.1`, for offline runs
    pub fn loopback() -> Self {
        Self {
            probe_target: DEFAULT_ROUTE_PROBE,
            loopback_only: true,
        }
    }

    pub fn with_probe_target(mut self, target: SocketAddr) -> Self {
        self.probe_target = target;
        self
    }

    fn outbound_address(&self) -> io::Result<Option<IpAddr>> {
        let bind: SocketAddr = match self.probe_target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (std::net::Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind)?;
        if let Err(e) = socket.connect(self.probe_target) {
            debug!(target: "moodspace-hal", "No route to {}: {}", self.probe_target, e);
            return Ok(None);
        }
        let address = socket.local_addr()?.ip();
        Ok((!address.is_unspecified() && !address.is_loopback()).then_some(address))
    }
}

impl Default for HostNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkLink for HostNetwork {
    type Error = io::Error;

    fn begin_connect(&mut self, credentials: &WifiCredentials) -> Result<(), Self::Error> {
        debug!(
            target: "moodspace-hal",
            "Host network is managed by the OS; ignoring join request for '{}'",
            credentials.ssid
        );
        Ok(())
    }

    fn is_connected(&mut self) -> Result<bool, Self::Error> {
        Ok(self.local_address()?.is_some())
    }

    fn local_address(&mut self) -> Result<Option<IpAddr>, Self::Error> {
        if self.loopback_only {
            return Ok(Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
        }
        self.outbound_address()
    }
}
