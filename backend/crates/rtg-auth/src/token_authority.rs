use crate::claims::RESERVED_CLAIMS;
use crate::{AccessToken, AuthError, Claims, JwtAlgorithm, Result as AuthErrorResult};

use rtg_config::AuthConfig;

use std::panic::Location;
use std::time::Duration;

use chrono::Utc;
use error_location::ErrorLocation;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::debug;
use serde_json::{Map, Value};

/// Clock skew tolerance applied to `exp` (seconds)
pub const TOKEN_LEEWAY_SECS: u64 = 10;

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Issues and verifies scoped, tenant-bound access tokens.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct TokenAuthority {
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
    validation: Validation,
    algorithm: JwtAlgorithm,
    default_ttl: Duration,
}

impl TokenAuthority {
    #[track_caller]
    pub fn new(algorithm: JwtAlgorithm, default_ttl: Duration) -> AuthErrorResult<Self> {
        let caller = Location::caller();
        let key_error = |e: jsonwebtoken::errors::Error| AuthError::KeyMaterial {
            message: e.to_string(),
            location: ErrorLocation::from(caller),
        };

        let (encoding_key, decoding_key) = match &algorithm {
            JwtAlgorithm::HS256 { secret }
            | JwtAlgorithm::HS384 { secret }
            | JwtAlgorithm::HS512 { secret } => (
                Some(EncodingKey::from_secret(secret)),
                DecodingKey::from_secret(secret),
            ),
            JwtAlgorithm::RS256 {
                public_key_pem,
                private_key_pem,
            } => {
                let decoding_key =
                    DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(key_error)?;
                let encoding_key = private_key_pem
                    .as_deref()
                    .map(|pem| EncodingKey::from_rsa_pem(pem.as_bytes()))
                    .transpose()
                    .map_err(key_error)?;
                (encoding_key, decoding_key)
            }
        };

        let mut validation = Validation::new(algorithm.algorithm());
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = TOKEN_LEEWAY_SECS;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
            algorithm,
            default_ttl,
        })
    }

    /// Create authority with HS256 (symmetric secret) and the default TTL
    pub fn with_hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = TOKEN_LEEWAY_SECS;

        Self {
            encoding_key: Some(EncodingKey::from_secret(secret)),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            algorithm: JwtAlgorithm::HS256 {
                secret: secret.to_vec(),
            },
            default_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    #[track_caller]
    pub fn from_config(config: &AuthConfig) -> AuthErrorResult<Self> {
        let algorithm = JwtAlgorithm::from_config(config)?;
        let authority = Self::new(algorithm, config.access_token_ttl())?;

        debug!(
            "Token authority ready ({}, ttl {}s, signing {})",
            authority.algorithm(),
            authority.default_ttl.as_secs(),
            if authority.can_sign() { "enabled" } else { "disabled" }
        );

        Ok(authority)
    }

    /// Sign a token for `user_id` in `tenant_id` carrying `scope`.
    ///
    /// `user_role` and `metadata` entries in `extra_claims` fill the typed
    /// fields, reserved claim names are ignored, and anything else is
    /// carried verbatim.
    #[track_caller]
    pub fn issue(
        &self,
        user_id: &str,
        tenant_id: &str,
        scope: &str,
        ttl: Duration,
        extra_claims: Option<Map<String, Value>>,
    ) -> AuthErrorResult<AccessToken> {
        let caller = Location::caller();
        let encoding_key =
            self.encoding_key
                .as_ref()
                .ok_or_else(|| AuthError::SigningUnavailable {
                    algorithm: self.algorithm().to_string(),
                    location: ErrorLocation::from(caller),
                })?;

        let now = Utc::now().timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        let mut claims = Claims {
            sub: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            scope: scope.to_string(),
            exp: now.saturating_add(ttl_secs),
            iat: Some(now),
            user_role: None,
            metadata: Map::new(),
            extra: Map::new(),
        };

        for (name, value) in extra_claims.unwrap_or_default() {
            if RESERVED_CLAIMS.contains(&name.as_str()) {
                continue;
            }
            match (name.as_str(), value) {
                ("user_role", Value::String(role)) => claims.user_role = Some(role),
                ("user_role", Value::Null) => claims.user_role = None,
                ("metadata", Value::Object(metadata)) => claims.metadata = metadata,
                ("user_role" | "metadata", other) => {
                    debug!("Ignoring malformed '{}' claim: {}", name, other);
                }
                (_, value) => {
                    claims.extra.insert(name, value);
                }
            }
        }

        claims.validate()?;

        let token = encode(
            &Header::new(self.algorithm.algorithm()),
            &claims,
            encoding_key,
        )
        .map_err(|e| AuthError::KeyMaterial {
            message: e.to_string(),
            location: ErrorLocation::from(caller),
        })?;

        Ok(AccessToken::new(token))
    }

    /// Sign a token with the configured default lifetime.
    #[track_caller]
    pub fn issue_default(
        &self,
        user_id: &str,
        tenant_id: &str,
        scope: &str,
    ) -> AuthErrorResult<AccessToken> {
        self.issue(user_id, tenant_id, scope, self.default_ttl, None)
    }

    /// Validate JWT token and return claims
    #[track_caller]
    pub fn verify(&self, token: &str) -> AuthErrorResult<Claims> {
        let caller = Location::caller();
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired {
                        location: ErrorLocation::from(caller),
                    },
                    _ => AuthError::TokenInvalid {
                        message: e.to_string(),
                        location: ErrorLocation::from(caller),
                    },
                }
            })?;

        token_data.claims.validate()?;

        Ok(token_data.claims)
    }

    /// Exact scope match; there is no scope hierarchy.
    #[track_caller]
    pub fn require_scope(&self, claims: &Claims, required: &str) -> AuthErrorResult<()> {
        if claims.scope != required {
            return Err(AuthError::InsufficientScope {
                required: required.to_string(),
                actual: claims.scope.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Verify `token` and require `scope` in one step.
    #[track_caller]
    pub fn authorize(&self, token: &str, scope: &str) -> AuthErrorResult<Claims> {
        let claims = self.verify(token)?;
        self.require_scope(&claims, scope)?;
        Ok(claims)
    }

    pub fn can_sign(&self) -> bool {
        self.encoding_key.is_some()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get the algorithm being used (for logging/debugging)
    pub fn algorithm(&self) -> &'static str {
        self.algorithm.name()
    }
}
