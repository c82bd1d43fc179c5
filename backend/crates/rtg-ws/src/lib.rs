pub mod app_state;
pub mod broadcast_dispatcher;
pub mod broadcast_outcome;
pub mod channel_subscriptions;
pub mod connection;
pub mod connection_config;
pub mod connection_id;
pub mod connection_limits;
pub mod connection_registry;
pub mod delivery_handler;
pub mod error;
pub mod heartbeat_monitor;
pub mod metrics;
pub mod metrics_timer;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use app_state::{AppState, WsQuery, handler, rejection_status};
pub use broadcast_dispatcher::BroadcastDispatcher;
pub use broadcast_outcome::BroadcastOutcome;
pub use channel_subscriptions::ChannelSubscriptions;
pub use connection::Connection;
pub use connection_config::ConnectionConfig;
pub use connection_id::ConnectionId;
pub use connection_limits::ConnectionLimits;
pub use connection_registry::{CLOSE_GOING_AWAY, CLOSE_POLICY_VIOLATION, ConnectionRegistry};
pub use delivery_handler::DeliveryHandler;
pub use error::{Result as WsResult, WsError};
pub use heartbeat_monitor::HeartbeatMonitor;
pub use metrics::{Metrics, MetricsSnapshot};
pub use metrics_timer::MetricsTimer;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::WebSocketConnection;

pub(crate) use error::Result;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for a WebSocket connection.
/// All log entries within the connection task will include these fields.
pub fn create_connection_span(
    connection_id: ConnectionId,
    tenant_id: &str,
    user_id: &str,
) -> tracing::Span {
    info_span!(
        "ws_connection",
        connection_id = %connection_id,
        tenant_id = %tenant_id,
        user_id = %user_id,
    )
}
