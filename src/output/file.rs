//! Results file output.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Append `lines` to `path`, creating it if needed.
///
/// ANSI styling is stripped so the file stays plain text.
pub fn append_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);

    for line in lines {
        writeln!(out, "{}", console::strip_ansi_codes(line.as_ref()))?;
    }

    out.flush()
}
