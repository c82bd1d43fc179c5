use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Exact origins, or `*` for any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec![String::from(DEFAULT_ALLOWED_ORIGIN)],
        }
    }
}

impl CorsConfig {
    /// Parse a comma-separated origin list, skipping blanks.
    pub fn parse_origins(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.enabled {
            return Ok(());
        }

        for origin in &self.allowed_origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://")
            {
                return Err(ConfigError::config(format!(
                    "cors.allowed_origins entry '{origin}' must be '*' or start with http:// or https://"
                )));
            }
        }

        Ok(())
    }
}
