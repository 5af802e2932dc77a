//! # portsec - a concurrent TCP/UDP port scanner
//!
//! Probes a set of ports on one address with a fixed-size worker pool and
//! classifies each port as open, closed, filtered or open|filtered.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsec::config::ScanConfig;
//! use portsec::scanner::{ProbeTimeouts, Protocol, ScanEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portsec::ScanError> {
//!     let config = ScanConfig::new("127.0.0.1".parse().unwrap(), vec![22, 80, 443], Protocol::Tcp, 10)?;
//!     let results = ScanEngine::new(&config, &ProbeTimeouts::default())?.run().await;
//!
//!     for result in results {
//!         println!("{} {} {}", result.port, result.status, result.service);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`scanner`] - TCP and UDP probes, the worker pool and `ScanEngine`
//! - [`config`] - validated scan configuration and user settings
//! - [`types`] - port specifications and scan targets
//! - [`services`] - well-known port to service name table
//! - [`output`] - console and file rendering of results
//! - [`cli`] - command-line front end
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::ScanConfig;
pub use error::{CliError, ScanError};
pub use scanner::{run_scan, PortStatus, Probe, Protocol, ScanEngine, ScanResult};
pub use types::{PortSpec, ScanTarget};
