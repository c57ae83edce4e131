// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::net::IpAddr;

/// Credentials for a station-mode join
#[derive(Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
    /// DHCP hostname to announce, if the platform supports it
    pub hostname: Option<String>,
}

impl WifiCredentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
            hostname: None,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }
}

// Keep the passphrase out of logs
impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("hostname", &self.hostname)
            .finish()
    }
}

/// Station-mode network interface
///
/// Joining is split into a non-blocking request and a state query so the
/// caller decides how long to wait (see [`crate::bootstrap::join_network`]).
pub trait NetworkLink {
    /// Platform-specific error type
    type Error: fmt::Debug;

    /// Start joining the network; returns without waiting for the link
    fn begin_connect(&mut self, credentials: &WifiCredentials) -> Result<(), Self::Error>;

    /// Whether the link is up and has an address
    fn is_connected(&mut self) -> Result<bool, Self::Error>;

    /// Routable local address, once connected
    fn local_address(&mut self) -> Result<Option<IpAddr>, Self::Error>;
}
