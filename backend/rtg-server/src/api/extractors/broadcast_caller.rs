use crate::api::extractors::system_caller::API_KEY_HEADER;
use crate::{ApiError, GatewayState};

use rtg_core::{Principal, SCOPE_BROADCAST_SEND};

use std::future::Future;
use std::panic::Location;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use error_location::ErrorLocation;

/// Who is calling a tenant or user broadcast endpoint.
///
/// `X-API-Key` takes precedence and yields the system principal. Otherwise
/// a bearer token carrying `broadcast:send` yields the token's user.
pub struct BroadcastCaller(pub Principal);

impl FromRequestParts<GatewayState> for BroadcastCaller {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let headers = &parts.headers;

            if let Some(key) = headers.get(API_KEY_HEADER) {
                state.system_api_key.verify(key.to_str().ok())?;
                return Ok(BroadcastCaller(Principal::System));
            }

            let token = headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .ok_or_else(|| ApiError::Unauthorized {
                    code: "MISSING_CREDENTIALS",
                    message: "System API key or bearer token required".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            let claims = state.ws.authority.authorize(token, SCOPE_BROADCAST_SEND)?;
            log::debug!(
                "Broadcast caller {} in tenant {}",
                claims.sub,
                claims.tenant_id
            );

            Ok(BroadcastCaller(Principal::User {
                user_id: claims.sub,
                tenant_id: claims.tenant_id,
            }))
        }
    }
}
