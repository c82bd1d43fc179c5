use crate::{WebhookProvider, WsMessage, WsMessageType};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Normalized inbound webhook, ready to be fanned out to a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub provider: WebhookProvider,
    pub event_type: String,
    pub event_id: Option<String>,
    pub payload: Value,
    pub tenant_id: String,
    pub received_at: DateTime<Utc>,
}

impl WebhookEvent {
    /// Build an event from a parsed provider payload, reading the event type
    /// and id the way the provider reports them.
    pub fn from_payload(provider: WebhookProvider, tenant_id: String, payload: Value) -> Self {
        Self {
            provider,
            event_type: provider.extract_event_type(&payload),
            event_id: provider.extract_event_id(&payload),
            payload,
            tenant_id,
            received_at: Utc::now(),
        }
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Notification frame delivered to the tenant's connections.
    pub fn to_ws_message(&self) -> WsMessage {
        let mut payload = Map::new();
        payload.insert("source".to_string(), json!("webhook"));
        payload.insert("provider".to_string(), json!(self.provider.as_str()));
        payload.insert("event_type".to_string(), json!(self.event_type));
        payload.insert("event_id".to_string(), json!(self.event_id));
        payload.insert("data".to_string(), self.payload.clone());
        payload.insert(
            "received_at".to_string(),
            json!(self.received_at.to_rfc3339()),
        );

        WsMessage::new(WsMessageType::Notification, payload).with_timestamp(self.received_at)
    }
}
