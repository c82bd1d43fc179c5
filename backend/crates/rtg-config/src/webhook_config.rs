use crate::{ConfigError, ConfigErrorResult};

use rtg_core::WebhookProvider;

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

pub const MAX_MAX_RETRIES: u32 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const MAX_RETRY_DELAY_SECS: u64 = 300;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Signing secret scoped to one tenant of one provider.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRegistrationConfig {
    pub provider: String,
    pub tenant_id: String,
    pub secret: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Inbound webhook handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Publish retries after the first attempt
    pub max_retries: u32,
    /// Fixed pause between publish attempts (seconds)
    pub retry_delay_secs: u64,
    /// Upper bound on the whole publish phase (seconds)
    pub timeout_secs: u64,
    /// Provider-wide signing secrets keyed by provider name
    pub secrets: HashMap<String, String>,
    pub registrations: Vec<WebhookRegistrationConfig>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            secrets: HashMap::new(),
            registrations: Vec::new(),
        }
    }
}

impl WebhookConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::webhook(format!(
                "webhook.max_retries must be 0-{}, got {}",
                MAX_MAX_RETRIES, self.max_retries
            )));
        }

        if self.retry_delay_secs > MAX_RETRY_DELAY_SECS {
            return Err(ConfigError::webhook(format!(
                "webhook.retry_delay_secs must be 0-{}, got {}",
                MAX_RETRY_DELAY_SECS, self.retry_delay_secs
            )));
        }

        if self.timeout_secs < MIN_TIMEOUT_SECS || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::webhook(format!(
                "webhook.timeout_secs must be {}-{}, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        for (provider, secret) in &self.secrets {
            Self::validate_provider(provider)?;
            if secret.is_empty() {
                return Err(ConfigError::webhook(format!(
                    "webhook.secrets.{provider} must not be empty"
                )));
            }
        }

        for registration in &self.registrations {
            Self::validate_provider(&registration.provider)?;
            if registration.tenant_id.trim().is_empty() {
                return Err(ConfigError::webhook(format!(
                    "webhook registration for {} has an empty tenant_id",
                    registration.provider
                )));
            }
            if registration.secret.is_empty() {
                return Err(ConfigError::webhook(format!(
                    "webhook registration {}/{} has an empty secret",
                    registration.provider, registration.tenant_id
                )));
            }
        }

        Ok(())
    }

    fn validate_provider(name: &str) -> ConfigErrorResult<()> {
        WebhookProvider::from_str(name)
            .map(|_| ())
            .map_err(|_| ConfigError::webhook(format!("unknown webhook provider '{name}'")))
    }
}
