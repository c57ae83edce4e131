// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Poll-driven request dispatcher
//!
//! ```text
//! IDLE -> accept? -- WouldBlock --> NoConnection
//!                 \-- stream --> READ -> ROUTE -> RESPOND -> CLOSE -> Served
//! ```
//!
//! The listener is non-blocking, so an idle poll costs one failed `accept`.
//! An accepted stream is switched back to blocking mode with a read/write
//! timeout; a slow peer can delay one iteration by at most that timeout.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use moodspace_config::ServerConfig;
use moodspace_engine::SystemStatus;
use tracing::{debug, info, warn};

use crate::dtos::StatusDto;
use crate::error::DispatchError;
use crate::http::{ok_response, Route};
use crate::page::MONITOR_PAGE;

/// Listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// `host:port`; port 0 picks an ephemeral port
    pub bind_address: String,
    /// Size of the single read taken from each request
    pub read_chunk_bytes: usize,
    pub client_io_timeout: Duration,
}

impl DispatcherConfig {
    pub fn new(bind_address: impl Into<String>) -> Self {
        Self {
            bind_address: bind_address.into(),
            ..Self::default()
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:80".to_string(),
            read_chunk_bytes: 1024,
            client_io_timeout: Duration::from_millis(2000),
        }
    }
}

impl From<&ServerConfig> for DispatcherConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            bind_address: config.bind_address(),
            read_chunk_bytes: config.read_chunk_bytes,
            client_io_timeout: Duration::from_millis(config.client_io_timeout_ms),
        }
    }
}

/// Listener lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatcherState {
    /// Not bound
    Inactive,
    /// Bound and accepting
    Active,
    /// `start` failed; call `stop` to reset
    Errored(String),
}

/// Result of one [`RequestDispatcher::poll_once`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing pending (or not started)
    NoConnection,
    /// One request answered and closed
    Served(Route),
    /// A connection was accepted but could not be answered
    Failed,
}

/// Single-connection-per-poll responder
#[derive(Debug)]
pub struct RequestDispatcher {
    config: DispatcherConfig,
    state: DispatcherState,
    listener: Option<TcpListener>,
    served: u64,
    failed: u64,
}

impl RequestDispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            state: DispatcherState::Inactive,
            listener: None,
            served: 0,
            failed: 0,
        }
    }

    /// Bind and switch the listener to non-blocking mode
    pub fn start(&mut self) -> Result<SocketAddr, DispatchError> {
        if self.state != DispatcherState::Inactive {
            return Err(DispatchError::InvalidState(format!(
                "cannot start: dispatcher is {:?}",
                self.state
            )));
        }

        match self.bind() {
            Ok((listener, address)) => {
                info!(target: "moodspace-api", "Dispatcher listening on {}", address);
                self.listener = Some(listener);
                self.state = DispatcherState::Active;
                Ok(address)
            }
            Err(e) => {
                self.state = DispatcherState::Errored(e.to_string());
                Err(e)
            }
        }
    }

    fn bind(&self) -> Result<(TcpListener, SocketAddr), DispatchError> {
        let cannot_bind = |source| DispatchError::CannotBind {
            address: self.config.bind_address.clone(),
            source,
        };
        let listener = TcpListener::bind(&self.config.bind_address).map_err(cannot_bind)?;
        listener.set_nonblocking(true).map_err(cannot_bind)?;
        let address = listener.local_addr().map_err(cannot_bind)?;
        Ok((listener, address))
    }

    /// Release the listener; valid from any state
    pub fn stop(&mut self) {
        if self.listener.take().is_some() {
            info!(target: "moodspace-api", "Dispatcher stopped");
        }
        self.state = DispatcherState::Inactive;
    }

    /// Bound address while active
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    pub fn state(&self) -> &DispatcherState {
        &self.state
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Requests answered since construction
    pub fn served(&self) -> u64 {
        self.served
    }

    /// Accepted connections that could not be answered
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Try to accept one connection and answer it with `status`
    ///
    /// Never blocks when nothing is pending, and never returns an error:
    /// failures are logged and counted.
    pub fn poll_once(&mut self, status: &SystemStatus) -> DispatchOutcome {
        let Some(listener) = &self.listener else {
            return DispatchOutcome::NoConnection;
        };

        let (stream, peer) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                return DispatchOutcome::NoConnection;
            }
            Err(e) => {
                return self.record_failure(None, DispatchError::Accept(e));
            }
        };

        match self.serve(stream, status) {
            Ok(route) => {
                self.served += 1;
                debug!(target: "moodspace-api", "Served {:?} to {}", route, peer);
                DispatchOutcome::Served(route)
            }
            Err(e) => self.record_failure(Some(peer), e),
        }
    }

    fn record_failure(&mut self, peer: Option<SocketAddr>, error: DispatchError) -> DispatchOutcome {
        self.failed += 1;
        match peer {
            Some(peer) => warn!(target: "moodspace-api", "Request from {} failed: {}", peer, error),
            None => warn!(target: "moodspace-api", "Request failed: {}", error),
        }
        DispatchOutcome::Failed
    }

    fn serve(&self, mut stream: TcpStream, status: &SystemStatus) -> Result<Route, DispatchError> {
        let timeout = Some(self.config.client_io_timeout);
        stream.set_nonblocking(false).map_err(DispatchError::Configure)?;
        stream.set_read_timeout(timeout).map_err(DispatchError::Configure)?;
        stream.set_write_timeout(timeout).map_err(DispatchError::Configure)?;

        let mut request = vec![0u8; self.config.read_chunk_bytes.max(1)];
        let len = match stream.read(&mut request) {
            Ok(len) => len,
            // A peer that connects and sends nothing gets the page
            Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => 0,
            Err(e) => return Err(DispatchError::Read(e)),
        };

        let route = Route::classify(&request[..len]);
        let response = match route {
            Route::Data => {
                let body = serde_json::to_vec(&StatusDto::from(status))?;
                ok_response(route.content_type(), &body)
            }
            Route::Page => ok_response(route.content_type(), MONITOR_PAGE.as_bytes()),
        };

        stream.write_all(&response).map_err(DispatchError::Write)?;
        stream.flush().map_err(DispatchError::Write)?;
        let _ = stream.shutdown(Shutdown::Both);
        Ok(route)
    }
}

impl Drop for RequestDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
