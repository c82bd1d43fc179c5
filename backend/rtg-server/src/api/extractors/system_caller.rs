//! Axum extractors for REST API authentication

use crate::{ApiError, GatewayState};

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the system API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Caller holding the system API key.
///
/// Rejects with 401 when `X-API-Key` is missing or does not match
/// `SYSTEM_API_KEY`.
pub struct SystemCaller;

impl FromRequestParts<GatewayState> for SystemCaller {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let provided = parts
                .headers
                .get(API_KEY_HEADER)
                .and_then(|value| value.to_str().ok());

            state.system_api_key.verify(provided)?;
            log::debug!("System API key accepted");

            Ok(SystemCaller)
        }
    }
}
