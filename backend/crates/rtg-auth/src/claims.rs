use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAX_TENANT_ID_LENGTH: usize = 128;

/// Claim names the authority always sets itself.
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "tenant_id", "scope", "exp", "iat"];

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,
    /// Tenant identifier
    pub tenant_id: String,
    /// Capability tag, e.g. `ws:connect`
    pub scope: String,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Any other claims supplied at issue time
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.tenant_id.is_empty() {
            return Err(Self::invalid("tenant_id cannot be empty"));
        }
        if self.tenant_id.len() > MAX_TENANT_ID_LENGTH {
            return Err(Self::invalid("tenant_id exceeds maximum length"));
        }

        if self.sub.is_empty() {
            return Err(Self::invalid("sub (user_id) cannot be empty"));
        }

        if self.scope.is_empty() {
            return Err(Self::invalid("scope cannot be empty"));
        }

        Ok(())
    }

    #[track_caller]
    fn invalid(message: &str) -> AuthError {
        AuthError::TokenInvalid {
            message: message.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
