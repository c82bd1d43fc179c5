use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_APP_NAME, DEFAULT_ENVIRONMENT, DEFAULT_HOST,
    DEFAULT_PORT, MIN_PORT, PRODUCTION_ENVIRONMENT,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub app_name: String,
    /// Deployment environment name (`development`, `staging`, `production`)
    pub environment: String,
    /// Enables the connection debug endpoint
    pub debug: bool,
    pub host: String,
    pub port: u16,
    /// Serves `GET /metrics`
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: String::from(DEFAULT_APP_NAME),
            environment: String::from(DEFAULT_ENVIRONMENT),
            debug: false,
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            metrics_enabled: true,
        }
    }
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case(PRODUCTION_ENVIRONMENT)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        // Port 0 lets the OS pick a free port.
        if self.port != 0 && self.port < MIN_PORT {
            return Err(ConfigError::server(format!(
                "server.port must be 0 (auto) or >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::server("server.host must not be empty"));
        }

        if self.app_name.trim().is_empty() {
            return Err(ConfigError::server("server.app_name must not be empty"));
        }

        if self.debug && self.is_production() {
            return Err(ConfigError::server(
                "server.debug cannot be enabled in the production environment",
            ));
        }

        Ok(())
    }
}
