use crate::{Priority, WsMessage, WsMessageType};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Audience of a broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum BroadcastTarget {
    User { tenant_id: String, user_id: String },
    Tenant { tenant_id: String },
    Global,
}

impl BroadcastTarget {
    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Self::User { tenant_id, .. } | Self::Tenant { tenant_id } => Some(tenant_id),
            Self::Global => None,
        }
    }

    pub fn scope_name(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Tenant { .. } => "tenant",
            Self::Global => "global",
        }
    }
}

/// Who is asking for the broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Holder of the system API key.
    System,
    /// Verified end user.
    User { user_id: String, tenant_id: String },
}

impl Principal {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::System => None,
            Self::User { user_id, .. } => Some(user_id),
        }
    }
}

/// A single fan-out request. Built per call and consumed by the dispatcher.
#[derive(Debug, Clone)]
pub struct BroadcastRequest {
    pub target: BroadcastTarget,
    pub message_type: WsMessageType,
    pub payload: Map<String, Value>,
    pub priority: Priority,
    pub principal: Principal,
    pub from_user: Option<String>,
}

impl BroadcastRequest {
    pub fn new(target: BroadcastTarget, principal: Principal, payload: Map<String, Value>) -> Self {
        Self {
            target,
            message_type: WsMessageType::Broadcast,
            payload,
            priority: Priority::Normal,
            principal,
            from_user: None,
        }
    }

    pub fn with_message_type(mut self, message_type: WsMessageType) -> Self {
        self.message_type = message_type;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_from_user(mut self, from_user: impl Into<String>) -> Self {
        self.from_user = Some(from_user.into());
        self
    }

    /// Wrap the payload in the envelope delivered to clients.
    ///
    /// The sender defaults to the requesting user, or `"system"` for the
    /// system principal.
    pub fn to_ws_message(&self) -> WsMessage {
        let from_user = self
            .from_user
            .clone()
            .or_else(|| self.principal.user_id().map(str::to_string))
            .unwrap_or_else(|| "system".to_string());

        let mut message = WsMessage::new(self.message_type, self.payload.clone())
            .with_message_id(Uuid::new_v4().to_string())
            .with_from_user(from_user)
            .with_priority(self.priority);

        if let BroadcastTarget::User { user_id, .. } = &self.target {
            message = message.with_to_user(user_id.clone());
        }

        message
    }
}
