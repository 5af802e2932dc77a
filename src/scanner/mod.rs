//! Scan execution engine.
//!
//! Ties the per-protocol probes to the worker pool. `ScanEngine` is built
//! from a validated `ScanConfig`; protocol dispatch is a closed enum, so
//! an unsupported protocol is rejected here, before any worker starts,
//! and every queued port yields exactly one `ScanResult`.

mod pool;
mod progress;
pub mod tcp;
mod traits;
pub mod udp;

pub use pool::ResultStream;
pub use progress::ProgressObserver;
pub use tcp::TcpProbe;
pub use traits::{PortStatus, Probe, Protocol, ScanResult};
pub use udp::UdpProbe;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::types::ScanTarget;
use async_trait::async_trait;
use pool::WorkerPool;
use progress::ProgressCounter;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Per-protocol I/O deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTimeouts {
    /// TCP connect bound.
    pub connect: Duration,
    /// UDP send bound.
    pub udp_write: Duration,
    /// UDP receive deadline.
    pub udp_read: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            connect: tcp::DEFAULT_CONNECT_TIMEOUT,
            udp_write: udp::DEFAULT_WRITE_TIMEOUT,
            udp_read: udp::DEFAULT_READ_TIMEOUT,
        }
    }
}

/// The probe matching a supported protocol.
#[derive(Debug, Clone, Copy)]
pub enum Prober {
    Tcp(TcpProbe),
    Udp(UdpProbe),
}

impl Prober {
    /// Select the probe for `protocol`.
    ///
    /// `Protocol::Stealth` has no probe and is rejected.
    pub fn for_protocol(protocol: Protocol, timeouts: &ProbeTimeouts) -> Result<Self, ScanError> {
        match protocol {
            Protocol::Tcp => Ok(Self::Tcp(TcpProbe::new(timeouts.connect))),
            Protocol::Udp => Ok(Self::Udp(UdpProbe::new(
                timeouts.udp_write,
                timeouts.udp_read,
            ))),
            Protocol::Stealth => Err(ScanError::UnsupportedProtocol(protocol)),
        }
    }
}

#[async_trait]
impl Probe for Prober {
    async fn probe(&self, target: ScanTarget) -> ScanResult {
        match self {
            Self::Tcp(probe) => probe.probe_tcp(target).await,
            Self::Udp(probe) => probe.probe_udp(target).await,
        }
    }
}

#[async_trait]
impl<P: Probe + ?Sized> Probe for Arc<P> {
    async fn probe(&self, target: ScanTarget) -> ScanResult {
        (**self).probe(target).await
    }
}

/// A configured scan, ready to start.
pub struct ScanEngine<P = Prober> {
    targets: Vec<ScanTarget>,
    workers: usize,
    probe: P,
    observer: Option<Arc<dyn ProgressObserver>>,
    cancel: CancellationToken,
}

impl ScanEngine<Prober> {
    /// Build an engine using the probe for `config.protocol()`.
    pub fn new(config: &ScanConfig, timeouts: &ProbeTimeouts) -> Result<Self, ScanError> {
        let probe = Prober::for_protocol(config.protocol(), timeouts)?;
        Ok(Self::with_probe(config, probe))
    }
}

impl<P: Probe + 'static> ScanEngine<P> {
    /// Build an engine around a caller-supplied probe.
    pub fn with_probe(config: &ScanConfig, probe: P) -> Self {
        Self {
            targets: config.targets().collect(),
            workers: config.max_workers(),
            probe,
            observer: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Notify `observer` after each completed job.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Stop taking new jobs once `token` is cancelled.
    ///
    /// A cancelled scan closes its stream with fewer results than ports.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Number of jobs this engine will queue.
    pub fn job_count(&self) -> usize {
        self.targets.len()
    }

    /// Start the scan and stream results as they complete.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self) -> ResultStream {
        info!(jobs = self.targets.len(), workers = self.workers, "scan started");

        let pool = WorkerPool {
            probe: Arc::new(self.probe),
            workers: self.workers,
            progress: Arc::new(ProgressCounter::new(self.targets.len(), self.observer)),
            cancel: self.cancel,
        };
        pool.spawn(self.targets)
    }

    /// Run the scan to completion. Results are unordered.
    pub async fn run(self) -> Vec<ScanResult> {
        self.start().collect().await
    }
}

/// Probe every configured port with `probe`, returning one result per port.
pub async fn run_scan<P: Probe + 'static>(config: &ScanConfig, probe: P) -> Vec<ScanResult> {
    ScanEngine::with_probe(config, probe).run().await
}
