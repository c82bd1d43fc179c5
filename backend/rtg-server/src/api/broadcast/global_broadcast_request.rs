use rtg_core::{Priority, WsMessageType};

use serde::Deserialize;
use serde_json::{Map, Value};

/// Request body for `POST /api/broadcast/global`
#[derive(Debug, Deserialize)]
pub struct GlobalBroadcastRequest {
    #[serde(default = "default_message_type")]
    pub message_type: WsMessageType,
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Sender shown to clients, `"system"` when omitted
    #[serde(default)]
    pub from_user: Option<String>,
}

fn default_message_type() -> WsMessageType {
    WsMessageType::System
}
