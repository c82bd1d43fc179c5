use crate::{ConfigError, ConfigErrorResult, LogFormat, LogLevel};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Append log lines to this file instead of stdout
    pub file: Option<String>,
    /// Colorize level names (text format on stdout only)
    pub colored: bool,
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(file) = &self.file
            && file.trim().is_empty()
        {
            return Err(ConfigError::logging("logging.file must not be empty when set"));
        }

        Ok(())
    }
}
