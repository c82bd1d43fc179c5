use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";
const DIGEST_LENGTH: usize = 32;

/// HMAC-SHA256 verification of provider webhook bodies.
pub struct WebhookVerifier;

impl WebhookVerifier {
    /// Check `signature_header` against the HMAC of the exact raw body.
    ///
    /// Accepts bare hex or `sha256=<hex>`. Comparison is constant time.
    #[track_caller]
    pub fn verify(raw_body: &[u8], signature_header: &str, secret: &str) -> AuthErrorResult<()> {
        let caller = Location::caller();
        let invalid = || AuthError::InvalidSignature {
            location: ErrorLocation::from(caller),
        };

        let hex_digest = match signature_header.strip_prefix(SIGNATURE_PREFIX) {
            Some(rest) => rest,
            None if signature_header.contains('=') => return Err(invalid()),
            None => signature_header,
        };

        let provided = hex::decode(hex_digest).map_err(|_| invalid())?;
        if provided.len() != DIGEST_LENGTH {
            return Err(invalid());
        }

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| invalid())?;
        mac.update(raw_body);
        mac.verify_slice(&provided).map_err(|_| invalid())
    }

    /// `sha256=<hex>` signature for `raw_body`.
    pub fn sign(raw_body: &[u8], secret: &str) -> String {
        // HMAC accepts keys of any length
        let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(raw_body);
        format!(
            "{}{}",
            SIGNATURE_PREFIX,
            hex::encode(mac.finalize().into_bytes())
        )
    }
}
