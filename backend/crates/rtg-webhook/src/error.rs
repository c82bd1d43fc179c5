use rtg_auth::AuthError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Missing x-tenant-id header {location}")]
    TenantRequired { location: ErrorLocation },

    #[error("Malformed webhook payload: {message} {location}")]
    MalformedPayload {
        message: String,
        location: ErrorLocation,
    },

    #[error("Webhook signature rejected: {source} {location}")]
    InvalidSignature {
        #[source]
        source: AuthError,
        location: ErrorLocation,
    },

    #[error("Webhook delivery failed after {attempts} attempt(s): {message} {location}")]
    DeliveryFailed {
        attempts: u32,
        message: String,
        location: ErrorLocation,
    },
}

impl WebhookError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TenantRequired { .. } => "TENANT_REQUIRED",
            Self::MalformedPayload { .. } => "MALFORMED_PAYLOAD",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::DeliveryFailed { .. } => "DELIVERY_FAILED",
        }
    }

    /// Message safe to return to the caller.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::TenantRequired { .. } => "x-tenant-id header is required",
            Self::MalformedPayload { .. } => "Invalid JSON payload",
            Self::InvalidSignature { .. } => "Invalid webhook signature",
            Self::DeliveryFailed { .. } => "Webhook could not be delivered",
        }
    }
}

impl From<AuthError> for WebhookError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        Self::InvalidSignature {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WebhookError>;
