use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("Invalid token: {message} {location}")]
    TokenInvalid {
        message: String,
        location: ErrorLocation,
    },

    #[error("Insufficient scope: required '{required}', got '{actual}' {location}")]
    InsufficientScope {
        required: String,
        actual: String,
        location: ErrorLocation,
    },

    #[error("Invalid webhook signature {location}")]
    InvalidSignature { location: ErrorLocation },

    #[error("System API key required {location}")]
    MissingApiKey { location: ErrorLocation },

    #[error("Invalid system API key {location}")]
    InvalidApiKey { location: ErrorLocation },

    #[error("Token signing unavailable: no private key configured for {algorithm} {location}")]
    SigningUnavailable {
        algorithm: String,
        location: ErrorLocation,
    },

    #[error("Invalid key material: {message} {location}")]
    KeyMaterial {
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenExpired { .. } => "TOKEN_EXPIRED",
            Self::TokenInvalid { .. } => "TOKEN_INVALID",
            Self::InsufficientScope { .. } => "INSUFFICIENT_SCOPE",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::MissingApiKey { .. } => "MISSING_API_KEY",
            Self::InvalidApiKey { .. } => "INVALID_API_KEY",
            Self::SigningUnavailable { .. } => "SIGNING_UNAVAILABLE",
            Self::KeyMaterial { .. } => "KEY_MATERIAL",
        }
    }

    /// Message safe to return to a client: no locations, no key details.
    pub fn client_message(&self) -> String {
        match self {
            Self::TokenExpired { .. } => "Token has expired".to_string(),
            Self::TokenInvalid { .. } => "Invalid token".to_string(),
            Self::InsufficientScope { required, .. } => {
                format!("Insufficient scope. Required: {required}")
            }
            Self::InvalidSignature { .. } => "Invalid webhook signature".to_string(),
            Self::MissingApiKey { .. } => "System API key required".to_string(),
            Self::InvalidApiKey { .. } => "Invalid system API key".to_string(),
            Self::SigningUnavailable { .. } | Self::KeyMaterial { .. } => {
                "Authentication is misconfigured".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
