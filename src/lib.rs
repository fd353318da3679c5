//! udts-screener: multi-timeframe trend screener over stock snapshots.
//!
//! Hexagonal architecture: the screening engine in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
