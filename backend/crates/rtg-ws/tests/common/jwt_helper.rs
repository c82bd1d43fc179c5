#![allow(dead_code)]

use rtg_core::SCOPE_WS_CONNECT;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

/// JWT claims matching the gateway's token format
#[derive(Debug, Serialize, Deserialize)]
pub struct TestJwtClaims {
    pub sub: String,
    pub tenant_id: String,
    pub scope: String,
    pub exp: u64,
    pub iat: u64,
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

fn sign(claims: &TestJwtClaims, jwt_secret: &[u8]) -> String {
    encode(
        &Header::default(), // HS256 by default
        claims,
        &EncodingKey::from_secret(jwt_secret),
    )
    .expect("Failed to encode JWT")
}

/// Create a valid connect token for testing
pub fn create_test_token(tenant_id: &str, user_id: &str, jwt_secret: &[u8]) -> String {
    create_token_with_scope(tenant_id, user_id, SCOPE_WS_CONNECT, jwt_secret)
}

pub fn create_token_with_scope(
    tenant_id: &str,
    user_id: &str,
    scope: &str,
    jwt_secret: &[u8],
) -> String {
    let now = now();
    let claims = TestJwtClaims {
        sub: user_id.to_string(),
        tenant_id: tenant_id.to_string(),
        scope: scope.to_string(),
        exp: now + Duration::from_secs(3600).as_secs(),
        iat: now,
    };
    sign(&claims, jwt_secret)
}

/// Create an expired JWT token (for auth rejection tests)
pub fn create_expired_token(tenant_id: &str, user_id: &str, jwt_secret: &[u8]) -> String {
    let past = now() - 3600; // Expired 1 hour ago

    let claims = TestJwtClaims {
        sub: user_id.to_string(),
        tenant_id: tenant_id.to_string(),
        scope: SCOPE_WS_CONNECT.to_string(),
        exp: past,
        iat: past - 3600,
    };
    sign(&claims, jwt_secret)
}

/// Create JWT token with malformed structure (for robustness testing)
pub fn create_malformed_token() -> String {
    "not.a.valid.jwt.token".to_string()
}
