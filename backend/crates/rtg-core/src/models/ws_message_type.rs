use crate::{CoreError, CoreResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Kind of frame exchanged over a WebSocket connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    Ping,
    Pong,
    Message,
    Broadcast,
    Notification,
    Error,
    System,
}

impl WsMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Message => "message",
            Self::Broadcast => "broadcast",
            Self::Notification => "notification",
            Self::Error => "error",
            Self::System => "system",
        }
    }

    /// Control frames never carry a payload.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Ping | Self::Pong)
    }
}

impl std::fmt::Display for WsMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WsMessageType {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "ping" => Ok(Self::Ping),
            "pong" => Ok(Self::Pong),
            "message" => Ok(Self::Message),
            "broadcast" => Ok(Self::Broadcast),
            "notification" => Ok(Self::Notification),
            "error" => Ok(Self::Error),
            "system" => Ok(Self::System),
            _ => Err(CoreError::InvalidMessageType {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
