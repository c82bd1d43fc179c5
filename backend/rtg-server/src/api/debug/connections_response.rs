use rtg_ws::Connection;

use serde::Serialize;

/// Response body for `GET /debug/connections`
#[derive(Debug, Serialize)]
pub struct ConnectionsResponse {
    pub stats: ConnectionStats,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionStats {
    pub active_connections: usize,
    pub tenants: usize,
    pub users: usize,
    pub max_connections: usize,
    pub subscribed_channels: usize,
}
