//! Probe trait abstraction and the result model.
//!
//! Defines a common interface for the per-protocol probes so the worker
//! pool can drive any of them, including instrumented ones in tests.

use crate::services::service_name;
use crate::types::ScanTarget;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a scanned port.
///
/// Every completed probe assigns exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// Port accepted the connection or answered the probe.
    Open,
    /// Port refused, or could not be reached at all.
    Closed,
    /// Probe silently dropped by an intermediate device.
    ///
    /// Modelled for future ICMP-based detection; no current probe
    /// produces it.
    Filtered,
    /// No UDP answer before the deadline: open-but-silent or filtered.
    #[serde(rename = "open|filtered")]
    OpenFiltered,
}

impl PortStatus {
    /// Whether the port may have something listening on it.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open | Self::OpenFiltered)
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
            Self::OpenFiltered => write!(f, "open|filtered"),
        }
    }
}

/// Result of probing a single port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub port: u16,
    pub status: PortStatus,
    pub service: String,
}

impl ScanResult {
    /// Create a result, resolving the service name from the port.
    pub fn new(port: u16, status: PortStatus) -> Self {
        Self {
            port,
            status,
            service: service_name(port).to_string(),
        }
    }
}

/// Scan protocols a configuration can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP connect scan.
    #[default]
    Tcp,
    /// UDP probe scan.
    Udp,
    /// Raw SYN scan. Accepted by the parser, rejected by the engine.
    Stealth,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
            Self::Stealth => write!(f, "Stealth TCP"),
        }
    }
}

impl std::str::FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tcp" | "connect" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            "stealth" | "syn" => Ok(Self::Stealth),
            _ => Err(format!("unknown protocol: {}", s)),
        }
    }
}

/// A single-port network check.
///
/// Implementations must always return a classified result: failures are
/// folded into a `PortStatus`, never raised.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, target: ScanTarget) -> ScanResult;
}
