//! Configuration validation.
//!
//! Validates all config fields before a snapshot is loaded, then resolves
//! them into `ScreenerSettings`.

use crate::domain::error::ScreenerError;
use crate::domain::membership::{parse_symbols, ReferenceIndex};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_SECTOR_TOP_N: usize = 5;
pub const DEFAULT_INDUSTRY_TOP_N: usize = 10;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Resolved configuration for one screener run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerSettings {
    pub snapshot_path: Option<String>,
    pub index: ReferenceIndex,
    pub page_size: usize,
    pub sector_top_n: usize,
    pub industry_top_n: usize,
    pub log_level: Option<String>,
}

impl ScreenerSettings {
    /// Validate, then read every setting with its default.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScreenerError> {
        validate_view(config)?;
        validate_aggregation(config)?;
        validate_log(config)?;

        Ok(Self {
            snapshot_path: non_blank(config.get_string("snapshot", "path")),
            index: reference_index(config)?,
            page_size: config.get_count("view", "page_size", DEFAULT_PAGE_SIZE),
            sector_top_n: config.get_count("aggregation", "sector_top_n", DEFAULT_SECTOR_TOP_N),
            industry_top_n: config.get_count(
                "aggregation",
                "industry_top_n",
                DEFAULT_INDUSTRY_TOP_N,
            ),
            log_level: non_blank(config.get_string("log", "level")),
        })
    }
}

impl Default for ScreenerSettings {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            index: ReferenceIndex::nifty50(),
            page_size: DEFAULT_PAGE_SIZE,
            sector_top_n: DEFAULT_SECTOR_TOP_N,
            industry_top_n: DEFAULT_INDUSTRY_TOP_N,
            log_level: None,
        }
    }
}

/// Full check used by `validate`: everything `from_config` checks plus a
/// required snapshot path.
pub fn validate_screener_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_snapshot(config)?;
    validate_view(config)?;
    validate_aggregation(config)?;
    validate_log(config)?;
    reference_index(config)?;
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_snapshot(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match non_blank(config.get_string("snapshot", "path")) {
        Some(_) => Ok(()),
        None => Err(ScreenerError::ConfigMissing {
            section: "snapshot".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_at_least_one(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), ScreenerError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v >= 1 => Ok(()),
        Ok(_) => Err(ScreenerError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be at least 1"),
        }),
        Err(_) => Err(ScreenerError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be an integer"),
        }),
    }
}

fn validate_view(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_at_least_one(config, "view", "page_size")
}

fn validate_aggregation(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_at_least_one(config, "aggregation", "sector_top_n")?;
    validate_at_least_one(config, "aggregation", "industry_top_n")
}

fn validate_log(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match non_blank(config.get_string("log", "level")) {
        Some(level) if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) => {
            Err(ScreenerError::ConfigInvalid {
                section: "log".to_string(),
                key: "level".to_string(),
                reason: format!("unknown log level {level}, expected one of {}", LOG_LEVELS.join(", ")),
            })
        }
        _ => Ok(()),
    }
}

/// The configured membership list, or the built-in NIFTY 50 set.
fn reference_index(config: &dyn ConfigPort) -> Result<ReferenceIndex, ScreenerError> {
    let Some(raw) = non_blank(config.get_string("membership", "symbols")) else {
        return Ok(ReferenceIndex::nifty50());
    };
    let symbols = parse_symbols(&raw).map_err(|e| ScreenerError::ConfigInvalid {
        section: "membership".to_string(),
        key: "symbols".to_string(),
        reason: e.to_string(),
    })?;
    let name = non_blank(config.get_string("membership", "name"))
        .unwrap_or_else(|| "custom".to_string());
    Ok(ReferenceIndex::new(name, symbols))
}
