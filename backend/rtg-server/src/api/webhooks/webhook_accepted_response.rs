use rtg_core::{WebhookEvent, WebhookProvider};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response body for an accepted webhook
#[derive(Debug, Serialize)]
pub struct WebhookAcceptedResponse {
    pub status: &'static str,
    pub provider: WebhookProvider,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<WebhookEvent> for WebhookAcceptedResponse {
    fn from(event: WebhookEvent) -> Self {
        Self {
            status: "accepted",
            provider: event.provider,
            event_type: event.event_type,
            event_id: event.event_id,
            timestamp: event.received_at,
        }
    }
}
