//! Application settings.
//!
//! Defaults can be overridden by a JSON file, looked up in the XDG config
//! directory (`~/.config/portsec/settings.json` on Linux) unless a path is
//! given explicitly. A missing default file is not an error.

use crate::config::scan::DEFAULT_WORKERS;
use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{ProbeTimeouts, Protocol};
use crate::types::PortSpec;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsec)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the per-user directories. Nothing is created.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("", "", "portsec").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Defaults applied when the command line leaves something unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Worker count used when none, or a non-positive one, is requested.
    pub default_workers: usize,
    /// Protocol used when none is requested.
    pub default_protocol: Protocol,
    /// Ports scanned when no `-p` is given.
    pub default_ports: PortSpec,
    /// TCP connect timeout in milliseconds.
    pub tcp_timeout_ms: u64,
    /// UDP send timeout in milliseconds.
    pub udp_write_timeout_ms: u64,
    /// UDP receive deadline in milliseconds.
    pub udp_read_timeout_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_workers: DEFAULT_WORKERS,
            default_protocol: Protocol::Tcp,
            default_ports: PortSpec::full(),
            tcp_timeout_ms: 1000,
            udp_write_timeout_ms: 1000,
            udp_read_timeout_ms: 2000,
        }
    }
}

impl AppSettings {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let file = Paths::discover()?.settings_file();
                if file.exists() {
                    Self::load_from(&file)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Probe deadlines derived from these settings.
    pub fn timeouts(&self) -> ProbeTimeouts {
        ProbeTimeouts {
            connect: Duration::from_millis(self.tcp_timeout_ms),
            udp_write: Duration::from_millis(self.udp_write_timeout_ms),
            udp_read: Duration::from_millis(self.udp_read_timeout_ms),
        }
    }
}
