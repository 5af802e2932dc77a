//! Error types for portsec.
//!
//! Uses `thiserror` for ergonomic error definitions. Connection-level
//! failures never show up here as caller-facing errors: probes fold them
//! into a `PortStatus`.

use crate::scanner::Protocol;
use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a scan, before any worker starts.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no ports to scan")]
    EmptyPorts,

    #[error("port {0} is listed more than once")]
    DuplicatePort(u16),

    #[error("worker count {0} is out of range (1-100)")]
    WorkerCount(usize),

    #[error("{0} scanning is not supported")]
    UnsupportedProtocol(Protocol),

    #[error("invalid target address: {0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Port(#[from] PortError),
}

/// Reasons a single probe could not complete its exchange.
///
/// These are logged and then collapsed into `PortStatus::Closed`.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("socket setup failed: {0}")]
    Socket(std::io::Error),

    #[error("send failed: {0}")]
    Send(std::io::Error),

    #[error("send timed out")]
    SendTimeout,
}

/// Settings loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type CliResult<T> = Result<T, CliError>;
