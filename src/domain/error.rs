//! Domain error types.
//!
//! The screening engine itself never fails; these errors come from loading
//! snapshots and configuration, parsing command arguments and writing exports.

/// Top-level error type for udts-screener.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("snapshot error: {reason}")]
    Snapshot { reason: String },

    #[error("snapshot parse error in {file}: {reason}")]
    SnapshotParse { file: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("export error: {reason}")]
    Export { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) | ScreenerError::Export { .. } => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::Snapshot { .. } | ScreenerError::SnapshotParse { .. } => 3,
            ScreenerError::UnknownPreset(_) | ScreenerError::InvalidArgument { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
