use crate::{ApiError, ApiResult, GatewayState, MetricsResponse};

use std::panic::Location;

use axum::{Json, extract::State};
use error_location::ErrorLocation;

/// GET /metrics - Connection, message and webhook totals for this instance
pub async fn metrics(State(state): State<GatewayState>) -> ApiResult<Json<MetricsResponse>> {
    if !state.config.server.metrics_enabled {
        return Err(ApiError::NotFound {
            message: "Metrics endpoint disabled".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let ws = state.ws.metrics.snapshot();
    let webhooks = state.ingestor.stats().snapshot();

    Ok(Json(MetricsResponse {
        active_websocket_connections: state.ws.registry.total_count().await,
        total_messages_sent: ws.total_messages_sent,
        total_messages_received: ws.total_messages_received,
        total_webhooks_processed: webhooks.total_processed,
        total_webhooks_failed: webhooks.total_failed,
        redis_pubsub_channels: state.ws.bus.channel_count().await,
        uptime_seconds: state.system.uptime_seconds(),
        memory_usage_mb: state.system.memory_usage_mb(),
    }))
}
