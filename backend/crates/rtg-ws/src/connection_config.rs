use rtg_config::WebSocketConfig;

use std::time::Duration;

/// Configuration for WebSocket connections
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Send buffer size (bounded to handle backpressure)
    pub send_buffer_size: usize,
    /// How often the server pings each client
    pub heartbeat_interval: Duration,
    /// Silence after which a connection is reaped
    pub heartbeat_timeout: Duration,
    /// Largest inbound frame accepted
    pub max_message_size: usize,
}

impl ConnectionConfig {
    pub fn from_config(config: &WebSocketConfig) -> Self {
        Self {
            send_buffer_size: config.send_buffer_size,
            heartbeat_interval: config.heartbeat_interval(),
            heartbeat_timeout: config.heartbeat_timeout(),
            max_message_size: config.message_max_size,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::from_config(&WebSocketConfig::default())
    }
}
