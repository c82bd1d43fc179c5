use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_JWT_SECRET_KEY: &str = "change-this-jwt-secret-key-before-deploying";
pub const DEFAULT_SYSTEM_API_KEY: &str = "change-this-system-api-key-before-deploying";
pub const DEFAULT_JWT_ALGORITHM: &str = "HS256";
pub const SUPPORTED_JWT_ALGORITHMS: [&str; 4] = ["HS256", "HS384", "HS512", "RS256"];

// HMAC secrets shorter than the digest weaken the signature
pub const MIN_JWT_SECRET_LENGTH: usize = 32;
pub const MIN_SYSTEM_API_KEY_LENGTH: usize = 16;

// Access token lifetime (minutes)
pub const MIN_ACCESS_TOKEN_EXPIRE_MINUTES: u64 = 1;
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: u64 = 1440;
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: u64 = 15;

/// Token signing and privileged-caller credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret for the HS* algorithms
    pub jwt_secret_key: String,
    pub jwt_algorithm: String,
    /// PEM public key for RS256 verification
    pub jwt_public_key_path: Option<String>,
    /// PEM private key for RS256 issuing (optional, verify-only without it)
    pub jwt_private_key_path: Option<String>,
    pub jwt_access_token_expire_minutes: u64,
    /// Credential for system-initiated broadcasts
    pub system_api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_key: String::from(DEFAULT_JWT_SECRET_KEY),
            jwt_algorithm: String::from(DEFAULT_JWT_ALGORITHM),
            jwt_public_key_path: None,
            jwt_private_key_path: None,
            jwt_access_token_expire_minutes: DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            system_api_key: String::from(DEFAULT_SYSTEM_API_KEY),
        }
    }
}

impl AuthConfig {
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.jwt_access_token_expire_minutes * 60)
    }

    pub fn is_rsa(&self) -> bool {
        self.jwt_algorithm.eq_ignore_ascii_case("RS256")
    }

    /// Validate auth settings. Placeholder secrets are rejected in production.
    pub fn validate(&self, production: bool) -> ConfigErrorResult<()> {
        let algorithm = self.jwt_algorithm.to_ascii_uppercase();
        if !SUPPORTED_JWT_ALGORITHMS.contains(&algorithm.as_str()) {
            return Err(ConfigError::auth(format!(
                "auth.jwt_algorithm must be one of {:?}, got {}",
                SUPPORTED_JWT_ALGORITHMS, self.jwt_algorithm
            )));
        }

        if self.is_rsa() {
            if self.jwt_public_key_path.is_none() {
                return Err(ConfigError::auth(
                    "auth.jwt_public_key_path is required when jwt_algorithm is RS256",
                ));
            }
        } else if self.jwt_secret_key.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::auth(format!(
                "auth.jwt_secret_key must be at least {} bytes, got {}",
                MIN_JWT_SECRET_LENGTH,
                self.jwt_secret_key.len()
            )));
        }

        if self.jwt_access_token_expire_minutes < MIN_ACCESS_TOKEN_EXPIRE_MINUTES
            || self.jwt_access_token_expire_minutes > MAX_ACCESS_TOKEN_EXPIRE_MINUTES
        {
            return Err(ConfigError::auth(format!(
                "auth.jwt_access_token_expire_minutes must be {}-{}, got {}",
                MIN_ACCESS_TOKEN_EXPIRE_MINUTES,
                MAX_ACCESS_TOKEN_EXPIRE_MINUTES,
                self.jwt_access_token_expire_minutes
            )));
        }

        if self.system_api_key.len() < MIN_SYSTEM_API_KEY_LENGTH {
            return Err(ConfigError::auth(format!(
                "auth.system_api_key must be at least {} characters",
                MIN_SYSTEM_API_KEY_LENGTH
            )));
        }

        if production {
            if !self.is_rsa() && self.jwt_secret_key == DEFAULT_JWT_SECRET_KEY {
                return Err(ConfigError::auth(
                    "auth.jwt_secret_key still has its placeholder value in production",
                ));
            }
            if self.system_api_key == DEFAULT_SYSTEM_API_KEY {
                return Err(ConfigError::auth(
                    "auth.system_api_key still has its placeholder value in production",
                ));
            }
        }

        Ok(())
    }
}
