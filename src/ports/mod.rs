//! Port traits at the I/O seams of the screener.

pub mod config_port;
pub mod export_port;
pub mod snapshot_port;
