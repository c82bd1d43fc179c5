use crate::GatewayState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET / - Service identity
pub async fn root(State(state): State<GatewayState>) -> Response {
    let server = &state.config.server;

    let body = json!({
        "service": server.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "environment": server.environment,
    });

    (StatusCode::OK, Json(body)).into_response()
}

/// GET /health - Bus connectivity and connection count
///
/// Degraded (still 200) when the pub/sub bus has lost its broker: local
/// delivery keeps working.
pub async fn health_check(State(state): State<GatewayState>) -> Response {
    let redis_connected = state.ws.bus.is_connected();
    let status = if redis_connected { "healthy" } else { "degraded" };
    let active_connections = state.ws.registry.total_count().await;

    let health = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "redis_connected": redis_connected,
        "active_connections": active_connections,
        "bus": state.ws.bus.name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - Liveness probe (is the process alive?)
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness probe (ready to accept traffic?)
pub async fn readiness_check(State(state): State<GatewayState>) -> Response {
    if state.ws.shutdown.is_shutdown() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }
    if !state.ws.bus.is_connected() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Pub/sub bus unavailable").into_response();
    }

    (StatusCode::OK, "Ready").into_response()
}
