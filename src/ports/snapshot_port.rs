//! Snapshot source port trait.

use crate::domain::error::ScreenerError;
use crate::domain::stock::Snapshot;

/// Delivers one complete snapshot of stock records.
pub trait SnapshotPort {
    fn load_snapshot(&self) -> Result<Snapshot, ScreenerError>;
}
