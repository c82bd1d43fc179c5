use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_REDIS_HOST: &str = "localhost";
pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const MAX_REDIS_DB: u8 = 15;

/// Pub/sub broker connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// When false the gateway runs single-instance with an in-process bus
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub db: u8,
    pub password: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: String::from(DEFAULT_REDIS_HOST),
            port: DEFAULT_REDIS_PORT,
            db: 0,
            password: None,
        }
    }
}

impl RedisConfig {
    /// Connection URL, with the password when one is configured.
    pub fn url(&self) -> String {
        match self.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }

    /// Connection URL safe for logs.
    pub fn redacted_url(&self) -> String {
        match self.password.as_deref().filter(|p| !p.is_empty()) {
            Some(_) => format!("redis://:***@{}:{}/{}", self.host, self.port, self.db),
            None => self.url(),
        }
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::redis("redis.host must not be empty"));
        }

        if self.port == 0 {
            return Err(ConfigError::redis("redis.port must not be 0"));
        }

        if self.db > MAX_REDIS_DB {
            return Err(ConfigError::redis(format!(
                "redis.db must be 0-{}, got {}",
                MAX_REDIS_DB, self.db
            )));
        }

        Ok(())
    }
}
