use crate::{AuthError, Result as AuthErrorResult};

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;
use subtle::ConstantTimeEq;

/// Credential for privileged, non-user callers (global broadcasts).
#[derive(Clone)]
pub struct SystemApiKey {
    expected: String,
}

impl SystemApiKey {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    #[track_caller]
    pub fn verify(&self, provided: Option<&str>) -> AuthErrorResult<()> {
        let provided = match provided {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(AuthError::MissingApiKey {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if bool::from(provided.as_bytes().ct_eq(self.expected.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey {
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

impl fmt::Debug for SystemApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SystemApiKey(***)")
    }
}
