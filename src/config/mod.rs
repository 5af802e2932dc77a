//! Configuration for portsec.
//!
//! `ScanConfig` is the validated input to the engine; `AppSettings` holds
//! user defaults read from an optional JSON file.

mod scan;
mod settings;

pub use scan::{clamp_workers, DisplayMode, ScanConfig, DEFAULT_WORKERS, MAX_WORKERS, MIN_WORKERS};
pub use settings::{AppSettings, Paths};
