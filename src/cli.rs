//! Command-line interface for portsec.
//!
//! Uses `clap` derive macros for declarative argument parsing. This layer
//! turns raw arguments plus `AppSettings` defaults into a validated
//! `ScanConfig`, then drives the engine and the result writer.

use crate::config::{clamp_workers, AppSettings, DisplayMode, ScanConfig};
use crate::error::CliResult;
use crate::output::{self, ResultWriter};
use crate::scanner::{Protocol, ScanEngine};
use crate::types::{parse_address, PortSpec};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// A concurrent TCP/UDP port scanner.
#[derive(Parser, Debug)]
#[command(name = "portsec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP/UDP port scanner", long_about = None)]
pub struct Args {
    /// Target IPv4 or IPv6 address
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g. "80", "80,443", "1-1000", "22,80,8000-9000")
    #[arg(short, long)]
    pub ports: Option<PortSpec>,

    /// Scanning protocol
    #[arg(short = 's', long, value_enum)]
    pub protocol: Option<Protocol>,

    /// Number of concurrent workers (clamped to 1-100)
    #[arg(short, long, allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Only show open and open|filtered ports
    #[arg(short, long, conflicts_with = "file")]
    pub open_only: bool,

    /// Append results to FILE instead of printing them
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Hide the progress bar and header
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH", env = "PORTSEC_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    fn display_mode(&self) -> DisplayMode {
        match (&self.file, self.open_only) {
            (Some(path), _) => DisplayMode::File(path.clone()),
            (None, true) => DisplayMode::OpenOnly,
            (None, false) => DisplayMode::All,
        }
    }

    /// Resolve arguments against `settings` into a validated config.
    pub fn scan_config(&self, settings: &AppSettings) -> CliResult<ScanConfig> {
        let address = parse_address(&self.target)?;
        let ports = self
            .ports
            .clone()
            .unwrap_or_else(|| settings.default_ports.clone());
        let protocol = self.protocol.unwrap_or(settings.default_protocol);
        let workers = clamp_workers(self.workers.unwrap_or(0), settings.default_workers);

        let config = ScanConfig::new(address, ports.into_ports(), protocol, workers)?
            .with_display(self.display_mode());
        Ok(config)
    }

    /// Run the scan described by these arguments.
    pub async fn execute(&self) -> CliResult<usize> {
        let settings = AppSettings::load(self.config.as_deref())?;
        let config = self.scan_config(&settings)?;
        let engine = ScanEngine::new(&config, &settings.timeouts())?;

        let header = output::scan_header(&config);
        if !self.quiet {
            println!("{}", console::style(&header).blue());
        }

        let cancel = CancellationToken::new();
        let ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping scan");
                ctrl_c.cancel();
            }
        });

        let progress = (!self.quiet).then(|| progress_bar(engine.job_count()));
        let mut engine = engine.with_cancellation(cancel.clone());
        if let Some(pb) = &progress {
            engine = engine.with_observer(Arc::new(pb.clone()));
        }

        let mut writer = ResultWriter::new(config.display().clone(), header, progress);
        let mut stream = engine.start();
        while let Some(result) = stream.next().await {
            writer.record(result);
        }
        let written = writer.finish()?;

        if cancel.is_cancelled() {
            output::print_warning("scan interrupted; results are incomplete");
        }

        Ok(written)
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CliError, ScanError};

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("portsec").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_come_from_settings() {
        let args = parse(&["127.0.0.1"]);
        let config = args.scan_config(&AppSettings::default()).unwrap();

        assert_eq!(config.ports().len(), 65536);
        assert_eq!(config.protocol(), Protocol::Tcp);
        assert_eq!(config.max_workers(), 10);
        assert_eq!(config.display(), &DisplayMode::All);
    }

    #[test]
    fn test_full_argument_set() {
        let args = parse(&["::1", "-p", "22,80", "-s", "udp", "-w", "5", "--open-only"]);
        let config = args.scan_config(&AppSettings::default()).unwrap();

        assert_eq!(config.ports(), &[22, 80]);
        assert_eq!(config.protocol(), Protocol::Udp);
        assert_eq!(config.max_workers(), 5);
        assert_eq!(config.display(), &DisplayMode::OpenOnly);
    }

    #[test]
    fn test_workers_are_clamped() {
        let settings = AppSettings::default();
        let high = parse(&["127.0.0.1", "-p", "1", "-w", "500"]);
        assert_eq!(high.scan_config(&settings).unwrap().max_workers(), 100);

        let negative = parse(&["127.0.0.1", "-p", "1", "-w", "-3"]);
        assert_eq!(negative.scan_config(&settings).unwrap().max_workers(), 10);
    }

    #[test]
    fn test_file_output() {
        let args = parse(&["10.0.0.1", "-p", "1", "-f", "out.txt"]);
        let config = args.scan_config(&AppSettings::default()).unwrap();
        assert_eq!(
            config.display(),
            &DisplayMode::File(PathBuf::from("out.txt"))
        );
    }

    #[test]
    fn test_invalid_target() {
        let args = parse(&["example", "-p", "80"]);
        let err = args.scan_config(&AppSettings::default()).unwrap_err();
        assert!(matches!(err, CliError::Scan(ScanError::InvalidTarget(_))));
    }

    #[test]
    fn test_bad_port_spec_is_a_parse_error() {
        let res = Args::try_parse_from(["portsec", "127.0.0.1", "-p", "22,22"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_open_only_conflicts_with_file() {
        let res = Args::try_parse_from(["portsec", "127.0.0.1", "-o", "-f", "x.txt"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_stealth_parses() {
        let args = parse(&["127.0.0.1", "-p", "1", "-s", "stealth"]);
        assert_eq!(args.protocol, Some(Protocol::Stealth));
    }
}
