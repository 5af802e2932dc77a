//! Port specification parsing.
//!
//! A `PortSpec` is the ordered, duplicate-free list of ports a scan will
//! probe. Every `u16` is a valid port here, including 0.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Error type for port parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("invalid port value: {0:?}")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("port {0} appears more than once in the port list")]
    Duplicate(u16),
    #[error("empty port specification")]
    Empty,
}

/// An inclusive range of ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Create a new range, rejecting `start > end`.
    pub fn new(start: u16, end: u16) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(start, end))
        } else {
            Ok(Self { start, end })
        }
    }

    pub const fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('-') {
            Some((start, end)) => Self::new(parse_port(start)?, parse_port(end)?),
            None => Ok(Self::single(parse_port(s)?)),
        }
    }
}

fn parse_port(s: &str) -> Result<u16, PortError> {
    let s = s.trim();
    s.parse()
        .map_err(|_| PortError::InvalidFormat(s.to_string()))
}

/// An ordered set of ports to scan.
///
/// Supports formats like:
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Range: "1-1000"
/// - Mixed: "22,80,443,8000-9000"
///
/// Order of first appearance is preserved. A port named twice, whether
/// directly or through overlapping ranges, is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortSpec {
    ports: Vec<u16>,
}

impl PortSpec {
    /// Every port, 0 through 65535.
    pub fn full() -> Self {
        Self {
            ports: (0..=u16::MAX).collect(),
        }
    }

    /// Build a spec from ranges, enforcing uniqueness.
    pub fn from_ranges(ranges: impl IntoIterator<Item = PortRange>) -> Result<Self, PortError> {
        let mut seen = HashSet::new();
        let mut ports = Vec::new();

        for range in ranges {
            for port in range.iter() {
                if !seen.insert(port) {
                    return Err(PortError::Duplicate(port));
                }
                ports.push(port);
            }
        }

        if ports.is_empty() {
            return Err(PortError::Empty);
        }

        Ok(Self { ports })
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn into_ports(self) -> Vec<u16> {
        self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortError::Empty);
        }

        let ranges = s
            .split(',')
            .map(str::parse::<PortRange>)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_ranges(ranges)
    }
}

impl TryFrom<String> for PortSpec {
    type Error = PortError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortSpec> for String {
    fn from(spec: PortSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for PortSpec {
    /// Collapses consecutive runs back into `a-b` ranges.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let mut iter = self.ports.iter().copied().peekable();

        while let Some(start) = iter.next() {
            let mut end = start;
            while let Some(&next) = iter.peek() {
                if end.checked_add(1) == Some(next) {
                    end = next;
                    iter.next();
                } else {
                    break;
                }
            }
            if start == end {
                parts.push(start.to_string());
            } else {
                parts.push(format!("{}-{}", start, end));
            }
        }

        write!(f, "{}", parts.join(","))
    }
}
