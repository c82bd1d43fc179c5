use crate::{AuthError, Result as AuthErrorResult};

use rtg_config::{AuthConfig, Config};

use std::panic::Location;

use error_location::ErrorLocation;
use jsonwebtoken::Algorithm;

/// Supported JWT algorithms with their key material
#[derive(Clone)]
pub enum JwtAlgorithm {
    /// HMAC with SHA-256 (symmetric key)
    HS256 { secret: Vec<u8> },
    /// HMAC with SHA-384 (symmetric key)
    HS384 { secret: Vec<u8> },
    /// HMAC with SHA-512 (symmetric key)
    HS512 { secret: Vec<u8> },
    /// RSA with SHA-256. Verify-only when no private key is given.
    RS256 {
        public_key_pem: String,
        private_key_pem: Option<String>,
    },
}

impl JwtAlgorithm {
    /// Build from configuration, reading PEM files relative to the config directory.
    #[track_caller]
    pub fn from_config(config: &AuthConfig) -> AuthErrorResult<Self> {
        let secret = config.jwt_secret_key.as_bytes().to_vec();

        match config.jwt_algorithm.to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::HS256 { secret }),
            "HS384" => Ok(Self::HS384 { secret }),
            "HS512" => Ok(Self::HS512 { secret }),
            "RS256" => {
                let public_path = config.jwt_public_key_path.as_deref().ok_or_else(|| {
                    AuthError::KeyMaterial {
                        message: "RS256 requires jwt_public_key_path".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    }
                })?;
                let public_key_pem = read_pem(public_path)?;
                let private_key_pem = config
                    .jwt_private_key_path
                    .as_deref()
                    .map(read_pem)
                    .transpose()?;

                Ok(Self::RS256 {
                    public_key_pem,
                    private_key_pem,
                })
            }
            other => Err(AuthError::KeyMaterial {
                message: format!("unsupported JWT algorithm '{other}'"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::HS256 { .. } => Algorithm::HS256,
            Self::HS384 { .. } => Algorithm::HS384,
            Self::HS512 { .. } => Algorithm::HS512,
            Self::RS256 { .. } => Algorithm::RS256,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HS256 { .. } => "HS256",
            Self::HS384 { .. } => "HS384",
            Self::HS512 { .. } => "HS512",
            Self::RS256 { .. } => "RS256",
        }
    }
}

#[track_caller]
fn read_pem(relative: &str) -> AuthErrorResult<String> {
    let caller = Location::caller();

    let path = Config::resolve_path(relative).map_err(|e| AuthError::KeyMaterial {
        message: e.to_string(),
        location: ErrorLocation::from(caller),
    })?;

    std::fs::read_to_string(&path).map_err(|e| AuthError::KeyMaterial {
        message: format!("cannot read {}: {}", path.display(), e),
        location: ErrorLocation::from(caller),
    })
}
