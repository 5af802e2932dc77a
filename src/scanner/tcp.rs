//! TCP connect probe.
//!
//! Uses the operating system's `connect()`; the handshake alone decides
//! the port's status, so one attempt is definitive.

use crate::scanner::traits::{PortStatus, Probe, ScanResult};
use crate::types::ScanTarget;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Default bound on a single connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// TCP connect probe.
///
/// Does not require elevated privileges. No data is exchanged: the stream
/// is dropped as soon as the handshake completes.
#[derive(Debug, Clone, Copy)]
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Classify the port behind `target`.
    ///
    /// Timeouts, refusals and unreachable errors all report `Closed`.
    pub async fn probe_tcp(&self, target: ScanTarget) -> ScanResult {
        let status = match timeout(self.timeout, TcpStream::connect(target.socket_addr())).await {
            Ok(Ok(stream)) => {
                drop(stream);
                PortStatus::Open
            }
            Ok(Err(e)) => {
                debug!(addr = %target, error = %e, "tcp connect failed");
                PortStatus::Closed
            }
            Err(_) => {
                debug!(addr = %target, timeout_ms = self.timeout.as_millis() as u64, "tcp connect timed out");
                PortStatus::Closed
            }
        };

        ScanResult::new(target.port, status)
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn probe(&self, target: ScanTarget) -> ScanResult {
        self.probe_tcp(target).await
    }
}
