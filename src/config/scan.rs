//! Validated scan configuration.

use crate::error::ScanError;
use crate::scanner::Protocol;
use crate::types::ScanTarget;
use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

/// Fewest workers a scan can run with.
pub const MIN_WORKERS: usize = 1;
/// Most workers a scan can run with.
pub const MAX_WORKERS: usize = 100;
/// Worker count used when none (or a non-positive one) is requested.
pub const DEFAULT_WORKERS: usize = 10;

/// Where results go once they come out of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Every result on the console.
    #[default]
    All,
    /// Only open and open|filtered results on the console.
    OpenOnly,
    /// Every result appended to a file.
    File(PathBuf),
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::OpenOnly => write!(f, "open only"),
            Self::File(path) => write!(f, "file ({})", path.display()),
        }
    }
}

/// Everything the engine needs to run one scan.
///
/// Invariants, enforced by [`ScanConfig::new`]: `ports` is non-empty and
/// duplicate-free, and `max_workers` lies in `1..=100`.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    address: IpAddr,
    ports: Vec<u16>,
    protocol: Protocol,
    max_workers: usize,
    display: DisplayMode,
}

impl ScanConfig {
    pub fn new(
        address: IpAddr,
        ports: Vec<u16>,
        protocol: Protocol,
        max_workers: usize,
    ) -> Result<Self, ScanError> {
        if ports.is_empty() {
            return Err(ScanError::EmptyPorts);
        }

        let mut seen = HashSet::with_capacity(ports.len());
        if let Some(&dup) = ports.iter().find(|&&port| !seen.insert(port)) {
            return Err(ScanError::DuplicatePort(dup));
        }

        if !(MIN_WORKERS..=MAX_WORKERS).contains(&max_workers) {
            return Err(ScanError::WorkerCount(max_workers));
        }

        Ok(Self {
            address,
            ports,
            protocol,
            max_workers,
            display: DisplayMode::default(),
        })
    }

    /// Set the display mode.
    pub fn with_display(mut self, display: DisplayMode) -> Self {
        self.display = display;
        self
    }

    pub fn address(&self) -> IpAddr {
        self.address
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn display(&self) -> &DisplayMode {
        &self.display
    }

    /// One target per configured port, in configured order.
    pub fn targets(&self) -> impl Iterator<Item = ScanTarget> + '_ {
        self.ports
            .iter()
            .map(move |&port| ScanTarget::new(self.address, port))
    }
}

/// Bring a requested worker count into `1..=100`.
///
/// Non-positive requests fall back to `default`; oversized ones are capped.
pub fn clamp_workers(requested: i64, default: usize) -> usize {
    if requested <= 0 {
        default.clamp(MIN_WORKERS, MAX_WORKERS)
    } else {
        usize::try_from(requested).map_or(MAX_WORKERS, |n| n.min(MAX_WORKERS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_valid_config() {
        let config = ScanConfig::new(LOCALHOST, vec![80, 22], Protocol::Udp, 5).unwrap();
        assert_eq!(config.ports(), &[80, 22]);
        assert_eq!(config.protocol(), Protocol::Udp);
        assert_eq!(config.max_workers(), 5);
        assert_eq!(config.display(), &DisplayMode::All);
    }

    #[test]
    fn test_empty_ports_rejected() {
        let err = ScanConfig::new(LOCALHOST, vec![], Protocol::Tcp, 5).unwrap_err();
        assert!(matches!(err, ScanError::EmptyPorts));
    }

    #[test]
    fn test_duplicate_ports_rejected() {
        let err = ScanConfig::new(LOCALHOST, vec![1, 2, 1], Protocol::Tcp, 5).unwrap_err();
        assert!(matches!(err, ScanError::DuplicatePort(1)));
    }

    #[test]
    fn test_worker_bounds() {
        assert!(matches!(
            ScanConfig::new(LOCALHOST, vec![1], Protocol::Tcp, 0),
            Err(ScanError::WorkerCount(0))
        ));
        assert!(matches!(
            ScanConfig::new(LOCALHOST, vec![1], Protocol::Tcp, 101),
            Err(ScanError::WorkerCount(101))
        ));
        assert!(ScanConfig::new(LOCALHOST, vec![1], Protocol::Tcp, 1).is_ok());
        assert!(ScanConfig::new(LOCALHOST, vec![1], Protocol::Tcp, 100).is_ok());
    }

    #[test]
    fn test_targets_follow_port_order() {
        let config = ScanConfig::new(LOCALHOST, vec![443, 80], Protocol::Tcp, 2).unwrap();
        let targets: Vec<ScanTarget> = config.targets().collect();
        assert_eq!(
            targets,
            vec![ScanTarget::new(LOCALHOST, 443), ScanTarget::new(LOCALHOST, 80)]
        );
    }

    #[test]
    fn test_clamp_workers() {
        assert_eq!(clamp_workers(5, DEFAULT_WORKERS), 5);
        assert_eq!(clamp_workers(0, DEFAULT_WORKERS), 10);
        assert_eq!(clamp_workers(-5, DEFAULT_WORKERS), 10);
        assert_eq!(clamp_workers(200, DEFAULT_WORKERS), 100);
        assert_eq!(clamp_workers(-1, 500), 100);
    }

    #[test]
    fn test_display_mode_names() {
        assert_eq!(DisplayMode::OpenOnly.to_string(), "open only");
        assert_eq!(
            DisplayMode::File(PathBuf::from("out.txt")).to_string(),
            "file (out.txt)"
        );
    }
}
