// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! Station-mode network join with a fixed attempt ceiling
//!
//! There is exactly one failure policy: if the link is not up after
//! `timeout / poll_interval` polls, [`join_network`] returns
//! [`BootstrapError::Timeout`] and the caller aborts startup.

use std::net::IpAddr;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::hal::{NetworkLink, TimeProvider, WifiCredentials};

/// Bootstrap failures
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("could not join network '{ssid}' within {waited_ms} ms")]
    Timeout { ssid: String, waited_ms: u64 },

    #[error("network link error: {0}")]
    Link(String),

    #[error("link is up but reports no address")]
    NoAddress,
}

/// Number of state polls allowed before giving up (at least one)
pub fn attempt_ceiling(timeout: Duration, poll_interval: Duration) -> u64 {
    let poll_ms = poll_interval.as_millis().max(1);
    (timeout.as_millis() / poll_ms).max(1) as u64
}

/// Join the network and return the routable local address
///
/// Returns immediately if the link is already up. Otherwise requests a join
/// and polls the link state every `poll_interval`, up to the attempt ceiling.
pub fn join_network<L, T>(
    link: &mut L,
    credentials: &WifiCredentials,
    timeout: Duration,
    poll_interval: Duration,
    clock: &T,
) -> Result<IpAddr, BootstrapError>
where
    L: NetworkLink,
    T: TimeProvider + ?Sized,
{
    if link.is_connected().map_err(link_error)? {
        debug!(target: "moodspace-hal", "Network link already up");
        return address_of(link);
    }

    info!(target: "moodspace-hal", "Joining network '{}'...", credentials.ssid);
    link.begin_connect(credentials).map_err(link_error)?;

    let ceiling = attempt_ceiling(timeout, poll_interval);
    let poll_ms = u32::try_from(poll_interval.as_millis()).unwrap_or(u32::MAX);
    let started_us = clock.get_time_us();

    for attempt in 1..=ceiling {
        clock.delay_ms(poll_ms);
        if link.is_connected().map_err(link_error)? {
            debug!(target: "moodspace-hal", "Link up after {} poll(s)", attempt);
            let address = address_of(link)?;
            info!(target: "moodspace-hal", "Connected to '{}' as {}", credentials.ssid, address);
            return Ok(address);
        }
    }

    let waited_ms = clock.elapsed_ms_since(started_us);
    warn!(
        target: "moodspace-hal",
        "Gave up joining '{}' after {} polls ({} ms)",
        credentials.ssid, ceiling, waited_ms
    );
    Err(BootstrapError::Timeout {
        ssid: credentials.ssid.clone(),
        waited_ms,
    })
}

fn address_of<L: NetworkLink>(link: &mut L) -> Result<IpAddr, BootstrapError> {
    link.local_address()
        .map_err(link_error)?
        .ok_or(BootstrapError::NoAddress)
}

fn link_error<E: core::fmt::Debug>(error: E) -> BootstrapError {
    BootstrapError::Link(format!("{:?}", error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::convert::Infallible;
    use std::net::Ipv4Addr;

    /// Clock that advances only when delayed
    #[derive(Default)]
    struct FakeClock {
        now_us: Cell<u64>,
    }

    impl TimeProvider for FakeClock {
        fn get_time_us(&self) -> u64 {
            self.now_us.get()
        }

        fn delay_us(&self, us: u32) {
            self.now_us.set(self.now_us.get() + u64::from(us));
        }
    }

    /// Link that comes up after a fixed number of state polls
    struct FakeLink {
        up_after_polls: Option<u32>,
        polls: u32,
        connect_requests: u32,
        address: Option<IpAddr>,
    }

    impl FakeLink {
        fn new(up_after_polls: Option<u32>) -> Self {
            Self {
                up_after_polls,
                polls: 0,
                connect_requests: 0,
                address: Some(IpAddr::V4(Ipv4Addr::new(192, 168, 4, 20))),
            }
        }
    }

    impl NetworkLink for FakeLink {
        type Error = Infallible;

        fn begin_connect(&mut self, _credentials: &WifiCredentials) -> Result<(), Self::Error> {
            self.connect_requests += 1;
            Ok(())
        }

        fn is_connected(&mut self) -> Result<bool, Self::Error> {
            let up = matches!(self.up_after_polls, Some(n) if self.polls >= n);
            self.polls += 1;
            Ok(up)
        }

        fn local_address(&mut self) -> Result<Option<IpAddr>, Self::Error> {
            Ok(self.address)
        }
    }

    fn credentials() -> WifiCredentials {
        WifiCredentials::new("classroom", "hunter2hunter2")
    }

    #[test]
    fn test_already_connected_short_circuits() {
        let mut link = FakeLink::new(Some(0));
        let clock = FakeClock::default();

        let address = join_network(
            &mut link,
            &credentials(),
            Duration::from_secs(15),
            Duration::from_millis(500),
            &clock,
        )
        .unwrap();

        assert_eq!(address, IpAddr::V4(Ipv4Addr::new(192, 168, 4, 20)));
        assert_eq!(link.connect_requests, 0);
        assert_eq!(clock.get_time_us(), 0);
    }

    #[test]
    fn test_connects_within_ceiling() {
        let mut link = FakeLink::new(Some(4));
        let clock = FakeClock::default();

        join_network(
            &mut link,
            &credentials(),
            Duration::from_secs(15),
            Duration::from_millis(500),
            &clock,
        )
        .unwrap();

        assert_eq!(link.connect_requests, 1);
        assert_eq!(clock.get_time_us(), 4 * 500_000);
    }

    #[test]
    fn test_timeout_after_ceiling() {
        let mut link = FakeLink::new(None);
        let clock = FakeClock::default();

        let err = join_network(
            &mut link,
            &credentials(),
            Duration::from_secs(15),
            Duration::from_millis(500),
            &clock,
        )
        .unwrap_err();

        match err {
            BootstrapError::Timeout { ssid, waited_ms } => {
                assert_eq!(ssid, "classroom");
                assert_eq!(waited_ms, 15_000);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        // Initial check plus 30 polls
        assert_eq!(link.polls, 31);
    }

    #[test]
    fn test_missing_address_is_an_error() {
        let mut link = FakeLink::new(Some(0));
        link.address = None;
        let clock = FakeClock::default();

        let err = join_network(
            &mut link,
            &credentials(),
            Duration::from_secs(1),
            Duration::from_millis(100),
            &clock,
        )
        .unwrap_err();
        assert!(matches!(err, BootstrapError::NoAddress));
    }

    #[test]
    fn test_attempt_ceiling() {
        assert_eq!(attempt_ceiling(Duration::from_secs(15), Duration::from_millis(500)), 30);
        assert_eq!(attempt_ceiling(Duration::from_millis(100), Duration::from_secs(1)), 1);
        assert_eq!(attempt_ceiling(Duration::from_secs(1), Duration::ZERO), 1000);
    }
}
