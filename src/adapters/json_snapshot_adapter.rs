//! JSON file snapshot adapter.
//!
//! Accepts either `{"stocks": [...], "timestamp": "..."}` or a bare array of
//! records. A record that cannot be read at all (no symbol, not an object) is
//! skipped with a warning; the rest of the snapshot still loads.

use std::fs;
use std::path::PathBuf;

use chrono::DateTime;
use serde::Deserialize;

use crate::domain::error::ScreenerError;
use crate::domain::stock::{Snapshot, StockRecord};
use crate::ports::snapshot_port::SnapshotPort;

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Wrapped {
        stocks: Vec<serde_json::Value>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    Bare(Vec<serde_json::Value>),
}

#[derive(Debug, Clone)]
pub struct JsonSnapshotAdapter {
    path: PathBuf,
}

impl JsonSnapshotAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Parse snapshot JSON already in memory. `source` names the origin in
    /// error messages.
    pub fn parse(content: &str, source: &str) -> Result<Snapshot, ScreenerError> {
        let file: SnapshotFile =
            serde_json::from_str(content).map_err(|e| ScreenerError::SnapshotParse {
                file: source.to_string(),
                reason: e.to_string(),
            })?;

        let (values, timestamp) = match file {
            SnapshotFile::Wrapped { stocks, timestamp } => (stocks, timestamp),
            SnapshotFile::Bare(stocks) => (stocks, None),
        };

        let mut stocks = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<StockRecord>(value) {
                Ok(record) => {
                    if !record.triple_flags_consistent() {
                        tracing::warn!(
                            symbol = %record.symbol,
                            "triple flags disagree with monthly/weekly/daily trends"
                        );
                    }
                    stocks.push(record);
                }
                Err(e) => tracing::warn!(index = i, error = %e, "skipping unreadable record"),
            }
        }

        let timestamp = timestamp.and_then(|ts| match DateTime::parse_from_rfc3339(ts.trim()) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(timestamp = %ts, error = %e, "ignoring unparsable snapshot timestamp");
                None
            }
        });

        Ok(Snapshot { stocks, timestamp })
    }
}

impl SnapshotPort for JsonSnapshotAdapter {
    fn load_snapshot(&self) -> Result<Snapshot, ScreenerError> {
        let content = fs::read_to_string(&self.path).map_err(|e| ScreenerError::Snapshot {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let snapshot = Self::parse(&content, &self.path.display().to_string())?;
        tracing::info!(
            path = %self.path.display(),
            records = snapshot.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}
