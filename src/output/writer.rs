//! Consumes the engine's result stream according to the display mode.

use crate::config::DisplayMode;
use crate::output::{append_lines, format_result};
use crate::scanner::ScanResult;
use chrono::Local;
use indicatif::ProgressBar;
use std::io;

/// Renders results as they arrive.
///
/// Console modes print immediately, through the progress bar when there
/// is one so its line is not torn. File mode buffers until [`finish`],
/// then writes everything sorted by port.
///
/// [`finish`]: ResultWriter::finish
pub struct ResultWriter {
    mode: DisplayMode,
    header: String,
    progress: Option<ProgressBar>,
    buffered: Vec<ScanResult>,
    shown: usize,
}

impl ResultWriter {
    pub fn new(mode: DisplayMode, header: impl Into<String>, progress: Option<ProgressBar>) -> Self {
        Self {
            mode,
            header: header.into(),
            progress,
            buffered: Vec::new(),
            shown: 0,
        }
    }

    /// Handle one result from the stream.
    pub fn record(&mut self, result: ScanResult) {
        match &self.mode {
            DisplayMode::File(_) => self.buffered.push(result),
            DisplayMode::OpenOnly if !result.status.is_open() => {}
            DisplayMode::All | DisplayMode::OpenOnly => {
                self.emit(&format_result(&result));
                self.shown += 1;
            }
        }
    }

    /// Flush buffered output. Returns how many results were written or shown.
    pub fn finish(mut self) -> io::Result<usize> {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }

        match &self.mode {
            DisplayMode::File(path) => {
                self.buffered.sort_by_key(|r| r.port);

                let mut lines = Vec::with_capacity(self.buffered.len() + 2);
                lines.push(format!(
                    "Scan created at: {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S %z")
                ));
                lines.push(self.header.clone());
                lines.extend(self.buffered.iter().map(format_result));

                append_lines(path, &lines)?;
                Ok(self.buffered.len())
            }
            DisplayMode::All | DisplayMode::OpenOnly => Ok(self.shown),
        }
    }

    fn emit(&self, line: &str) {
        match &self.progress {
            Some(pb) if !pb.is_hidden() => pb.println(line),
            _ => println!("{}", line),
        }
    }
}
