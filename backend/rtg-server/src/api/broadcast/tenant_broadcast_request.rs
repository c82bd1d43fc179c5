use rtg_core::{Priority, WsMessageType};

use serde::Deserialize;
use serde_json::{Map, Value};

/// Request body for `POST /api/broadcast/tenant`
#[derive(Debug, Deserialize)]
pub struct TenantBroadcastRequest {
    pub tenant_id: String,
    #[serde(default = "default_message_type")]
    pub message_type: WsMessageType,
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub from_user: Option<String>,
}

pub(crate) fn default_message_type() -> WsMessageType {
    WsMessageType::Broadcast
}
