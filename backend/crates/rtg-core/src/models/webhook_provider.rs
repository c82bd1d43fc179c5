use crate::{CoreError, CoreResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const UNKNOWN_EVENT_TYPE: &str = "unknown";

/// External systems allowed to post webhooks to the gateway.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WebhookProvider {
    Stripe,
    Github,
    Slack,
    Twilio,
    Sendgrid,
    Custom,
}

impl WebhookProvider {
    pub const ALL: [WebhookProvider; 6] = [
        Self::Stripe,
        Self::Github,
        Self::Slack,
        Self::Twilio,
        Self::Sendgrid,
        Self::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Github => "github",
            Self::Slack => "slack",
            Self::Twilio => "twilio",
            Self::Sendgrid => "sendgrid",
            Self::Custom => "custom",
        }
    }

    /// Payload field holding the provider's event type.
    pub fn event_type_field(&self) -> &'static str {
        match self {
            Self::Stripe => "type",
            Self::Github => "action",
            Self::Slack => "type",
            Self::Twilio => "MessageStatus",
            Self::Sendgrid => "event",
            Self::Custom => "event_type",
        }
    }

    /// Payload field holding the provider's own event identifier, if it sends one.
    pub fn event_id_field(&self) -> Option<&'static str> {
        match self {
            Self::Stripe => Some("id"),
            Self::Github => None,
            Self::Slack => Some("event_id"),
            Self::Twilio => Some("MessageSid"),
            Self::Sendgrid => Some("sg_event_id"),
            Self::Custom => Some("event_id"),
        }
    }

    /// Environment variable carrying the provider-wide signing secret.
    pub fn secret_env_var(&self) -> &'static str {
        match self {
            Self::Stripe => "WEBHOOK_SECRET_STRIPE",
            Self::Github => "WEBHOOK_SECRET_GITHUB",
            Self::Slack => "WEBHOOK_SECRET_SLACK",
            Self::Twilio => "WEBHOOK_SECRET_TWILIO",
            Self::Sendgrid => "WEBHOOK_SECRET_SENDGRID",
            Self::Custom => "WEBHOOK_SECRET_CUSTOM",
        }
    }

    /// Event type read from the payload, `"unknown"` when absent or not a string.
    pub fn extract_event_type(&self, payload: &Value) -> String {
        payload
            .get(self.event_type_field())
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_EVENT_TYPE)
            .to_string()
    }

    pub fn extract_event_id(&self, payload: &Value) -> Option<String> {
        let field = self.event_id_field()?;
        match payload.get(field)? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

impl std::fmt::Display for WebhookProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookProvider {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stripe" => Ok(Self::Stripe),
            "github" => Ok(Self::Github),
            "slack" => Ok(Self::Slack),
            "twilio" => Ok(Self::Twilio),
            "sendgrid" => Ok(Self::Sendgrid),
            "custom" => Ok(Self::Custom),
            _ => Err(CoreError::InvalidProvider {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
