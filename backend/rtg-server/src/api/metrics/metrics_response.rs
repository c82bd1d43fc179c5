use serde::Serialize;

/// Response body for `GET /metrics`
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub active_websocket_connections: usize,
    pub total_messages_sent: u64,
    pub total_messages_received: u64,
    pub total_webhooks_processed: u64,
    pub total_webhooks_failed: u64,
    pub redis_pubsub_channels: usize,
    pub uptime_seconds: f64,
    pub memory_usage_mb: f64,
}
