//! Core value types shared by the engine and its front end.

mod port;
mod target;

pub use port::{PortError, PortRange, PortSpec};
pub use target::{parse_address, ScanTarget};
