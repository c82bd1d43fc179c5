pub mod api;
pub mod error;
pub mod gateway_state;
pub mod health;
pub mod logger;
pub mod routes;
pub mod system_metrics;

#[cfg(test)]
mod tests;

pub use api::{
    broadcast::{
        broadcast::{broadcast_global, broadcast_tenant, broadcast_user},
        broadcast_response::BroadcastResponse,
        global_broadcast_request::GlobalBroadcastRequest,
        tenant_broadcast_request::TenantBroadcastRequest,
        user_broadcast_request::UserBroadcastRequest,
    },
    debug::{
        connections::list_connections,
        connections_response::{ConnectionStats, ConnectionsResponse},
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::{
        broadcast_caller::BroadcastCaller,
        system_caller::{API_KEY_HEADER, SystemCaller},
    },
    metrics::{metrics::metrics, metrics_response::MetricsResponse},
    webhooks::{webhook_accepted_response::WebhookAcceptedResponse, webhooks::receive_webhook},
};
pub use error::{Result as ServerResult, ServerError};
pub use gateway_state::GatewayState;
pub use system_metrics::SystemMetrics;

pub use crate::routes::build_router;
