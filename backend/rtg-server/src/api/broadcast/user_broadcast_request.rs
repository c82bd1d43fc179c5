use crate::api::broadcast::tenant_broadcast_request::default_message_type;

use rtg_core::{Priority, WsMessageType};

use serde::Deserialize;
use serde_json::{Map, Value};

/// Request body for `POST /api/broadcast/user`
#[derive(Debug, Deserialize)]
pub struct UserBroadcastRequest {
    pub tenant_id: String,
    pub user_id: String,
    #[serde(default = "default_message_type")]
    pub message_type: WsMessageType,
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub from_user: Option<String>,
}
