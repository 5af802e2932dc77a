//! Scan target types.

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// One unit of work: a single port on a single address.
///
/// Created when the job queue is filled and consumed by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    pub address: IpAddr,
    pub port: u16,
}

impl ScanTarget {
    pub const fn new(address: IpAddr, port: u16) -> Self {
        Self { address, port }
    }

    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}

/// Parse a target address. Only literal IPv4 and IPv6 addresses are accepted.
pub fn parse_address(input: &str) -> Result<IpAddr, ScanError> {
    input
        .trim()
        .parse()
        .map_err(|_| ScanError::InvalidTarget(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_address() {
        assert!(parse_address("192.168.0.1").is_ok());
        assert!(parse_address("::1").is_ok());
        assert!(parse_address("300.168.1.1").is_err());
        assert!(parse_address("not_an_ip").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_target_display() {
        let v4 = ScanTarget::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 80);
        assert_eq!(v4.to_string(), "127.0.0.1:80");

        let v6 = ScanTarget::new("::1".parse().unwrap(), 443);
        assert_eq!(v6.to_string(), "[::1]:443");
    }
}
