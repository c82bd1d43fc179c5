use crate::{CoreError, CoreResult, Priority, WsMessageType};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Envelope for every frame exchanged with a WebSocket client.
///
/// `payload` is always a JSON object. Ping and pong frames keep it empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsMessage {
    #[serde(rename = "type")]
    pub message_type: WsMessageType,
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl WsMessage {
    /// Build a message stamped with the current time. Payloads handed to
    /// control frames are dropped.
    pub fn new(message_type: WsMessageType, payload: Map<String, Value>) -> Self {
        let payload = if message_type.is_control() {
            Map::new()
        } else {
            payload
        };

        Self {
            message_type,
            payload,
            timestamp: Utc::now(),
            message_id: None,
            from_user: None,
            to_user: None,
            priority: None,
        }
    }

    pub fn ping() -> Self {
        Self::new(WsMessageType::Ping, Map::new())
    }

    pub fn pong() -> Self {
        Self::new(WsMessageType::Pong, Map::new())
    }

    pub fn system(payload: Map<String, Value>) -> Self {
        Self::new(WsMessageType::System, payload)
    }

    /// Error frame sent back to a client. Only the short message is exposed.
    pub fn error(message: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert("message".to_string(), json!(message.into()));
        Self::new(WsMessageType::Error, payload)
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_from_user(mut self, from_user: impl Into<String>) -> Self {
        self.from_user = Some(from_user.into());
        self
    }

    pub fn with_to_user(mut self, to_user: impl Into<String>) -> Self {
        self.to_user = Some(to_user.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        if self.message_type.is_control() && !self.payload.is_empty() {
            return Err(CoreError::Validation {
                message: format!("{} frames must not carry a payload", self.message_type),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    #[track_caller]
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|source| CoreError::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Parse and validate a frame received from a client.
    #[track_caller]
    pub fn from_json(text: &str) -> CoreResult<Self> {
        let message: Self = serde_json::from_str(text).map_err(|source| CoreError::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;
        message.validate()?;
        Ok(message)
    }
}
