use crate::ConnectionId;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of a live connection. The registry owns the real entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub connection_id: ConnectionId,
    pub user_id: String,
    pub tenant_id: String,
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub connected_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
}
