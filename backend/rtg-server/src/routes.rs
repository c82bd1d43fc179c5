use crate::{
    GatewayState, broadcast_global, broadcast_tenant, broadcast_user, health, list_connections,
    metrics, receive_webhook,
};

use rtg_config::CorsConfig;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: GatewayState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let router = Router::new()
        // WebSocket endpoint
        .route("/ws", get(rtg_ws::handler))
        // Service and health endpoints
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(metrics))
        // Inbound webhooks
        .route("/webhooks/{provider}", post(receive_webhook))
        // Server-side broadcasts
        .route("/api/broadcast/global", post(broadcast_global))
        .route("/api/broadcast/tenant", post(broadcast_tenant))
        .route("/api/broadcast/user", post(broadcast_user))
        // Debug endpoints
        .route("/debug/connections", get(list_connections))
        .with_state(state);

    match cors {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

/// CORS from configuration; `None` when disabled
fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if !config.enabled {
        return None;
    }

    let origins = if config.allows_any() {
        AllowOrigin::from(Any)
    } else {
        let list: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Skipping invalid CORS origin {origin}: {e}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(list)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
