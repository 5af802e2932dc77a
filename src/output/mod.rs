//! Output formatting module.
//!
//! Renders engine results for the console or a results file. The engine
//! itself knows nothing about display modes.

mod file;
mod writer;

pub use file::append_lines;
pub use writer::ResultWriter;

use crate::config::ScanConfig;
use crate::scanner::{PortStatus, ScanResult};
use console::{style, Style};

/// One-line summary of a scan, printed before it starts.
pub fn scan_header(config: &ScanConfig) -> String {
    format!(
        "Scanning: {} | Protocol: {} | Ports: {} | Workers: {} | Display: {}",
        config.address(),
        config.protocol(),
        config.ports().len(),
        config.max_workers(),
        config.display()
    )
}

/// Format a single result, coloured by status.
pub fn format_result(result: &ScanResult) -> String {
    let status_style = match result.status {
        PortStatus::Open => Style::new().green().bold(),
        PortStatus::Closed => Style::new().red(),
        PortStatus::Filtered | PortStatus::OpenFiltered => Style::new().yellow(),
    };

    format!(
        "Port: {} | Status: {} | Service: {}",
        result.port,
        status_style.apply_to(result.status),
        result.service
    )
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
