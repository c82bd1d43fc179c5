use crate::{ApiError, ApiResult, ConnectionStats, ConnectionsResponse, GatewayState};

use std::panic::Location;

use axum::{Json, extract::State};
use error_location::ErrorLocation;

/// GET /debug/connections - Live connection snapshot, only with `DEBUG=true`
pub async fn list_connections(
    State(state): State<GatewayState>,
) -> ApiResult<Json<ConnectionsResponse>> {
    if !state.config.server.debug {
        return Err(ApiError::NotFound {
            message: "Debug endpoint disabled".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let registry = &state.ws.registry;
    let connections = registry.snapshot().await;

    Ok(Json(ConnectionsResponse {
        stats: ConnectionStats {
            active_connections: connections.len(),
            tenants: registry.tenant_count().await,
            users: registry.user_count().await,
            max_connections: registry.limits().max_total,
            subscribed_channels: state.ws.subscriptions.channel_count().await,
        },
        connections,
    }))
}
