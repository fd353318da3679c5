//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive. Typed getters fall back to the
//! caller's default when a value is missing; a value that is present but
//! unparsable also falls back, with a warning.

use crate::domain::error::ScreenerError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
    source: String,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScreenerError> {
        let source = path.as_ref().display().to_string();
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|reason| ScreenerError::ConfigParse {
                file: source.clone(),
                reason,
            })?;
        tracing::debug!(file = %source, "loaded config");
        Ok(Self { config, source })
    }

    pub fn from_string(content: &str) -> Result<Self, ScreenerError> {
        let source = "<inline>".to_string();
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| ScreenerError::ConfigParse {
                file: source.clone(),
                reason,
            })?;
        Ok(Self { config, source })
    }

    /// File path the config was read from, or `<inline>`.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn typed<T>(
        &self,
        section: &str,
        key: &str,
        default: T,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> T {
        let Some(raw) = self.config.get(section, key) else {
            return default;
        };
        match parse(&raw) {
            Some(v) => v,
            None => {
                tracing::warn!(
                    file = %self.source,
                    section,
                    key,
                    value = %raw,
                    "unparsable config value, using default"
                );
                default
            }
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_count(&self, section: &str, key: &str, default: usize) -> usize {
        self.typed(section, key, default, |v| v.trim().parse().ok())
    }
}
