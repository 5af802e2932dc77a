//! UDP probe.
//!
//! Sends a single one-byte datagram and classifies the port by what comes
//! back (or doesn't).
//!
//! # Detection
//!
//! 1. **Datagram received**: the port is open.
//! 2. **Connection refused** (ICMP port unreachable surfaced on the
//!    connected socket): the port is closed.
//! 3. **Silence until the deadline**: open or filtered, indistinguishable.
//!
//! `PortStatus::Filtered` is never reported; telling a drop apart from a
//! silent service would need ICMP administratively-prohibited handling.

use crate::error::ProbeError;
use crate::scanner::traits::{PortStatus, Probe, ScanResult};
use crate::types::ScanTarget;
use async_trait::async_trait;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::debug;

/// Payload sent to every port.
const PROBE_PAYLOAD: [u8; 1] = [0x00];

pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// UDP probe with bounded send and receive.
#[derive(Debug, Clone, Copy)]
pub struct UdpProbe {
    write_timeout: Duration,
    read_timeout: Duration,
}

impl UdpProbe {
    pub fn new(write_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            write_timeout,
            read_timeout,
        }
    }

    /// Classify the port behind `target`.
    ///
    /// Socket setup and send failures report `Closed`.
    pub async fn probe_udp(&self, target: ScanTarget) -> ScanResult {
        let status = self.exchange(target).await.unwrap_or_else(|e| {
            debug!(addr = %target, error = %e, "udp probe aborted");
            PortStatus::Closed
        });

        ScanResult::new(target.port, status)
    }

    async fn exchange(&self, target: ScanTarget) -> Result<PortStatus, ProbeError> {
        let socket = UdpSocket::bind(unspecified_for(target.address))
            .await
            .map_err(ProbeError::Socket)?;
        socket
            .connect(target.socket_addr())
            .await
            .map_err(ProbeError::Socket)?;

        match timeout(self.write_timeout, socket.send(&PROBE_PAYLOAD)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(ProbeError::Send(e)),
            Err(_) => return Err(ProbeError::SendTimeout),
        }

        let mut buf = [0u8; 1024];
        let status = match timeout(self.read_timeout, socket.recv(&mut buf)).await {
            Ok(Ok(_)) => PortStatus::Open,
            Ok(Err(e)) => classify_recv_error(target, &e),
            Err(_) => PortStatus::OpenFiltered,
        };

        Ok(status)
    }
}

impl Default for UdpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_WRITE_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }
}

#[async_trait]
impl Probe for UdpProbe {
    async fn probe(&self, target: ScanTarget) -> ScanResult {
        self.probe_udp(target).await
    }
}

/// Local wildcard address matching the target's family.
fn unspecified_for(address: IpAddr) -> SocketAddr {
    match address {
        IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    }
}

fn classify_recv_error(target: ScanTarget, e: &io::Error) -> PortStatus {
    if e.kind() != io::ErrorKind::ConnectionRefused {
        debug!(addr = %target, error = %e, "udp receive failed");
    }
    PortStatus::Closed
}
