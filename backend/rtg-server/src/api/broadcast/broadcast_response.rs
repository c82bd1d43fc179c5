use rtg_ws::BroadcastOutcome;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response body for every broadcast endpoint
#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub success: bool,
    pub message: String,
    /// Local connections the broadcast was addressed to
    pub subscribers_reached: usize,
    pub timestamp: DateTime<Utc>,
}

impl BroadcastResponse {
    pub fn from_outcome(outcome: &BroadcastOutcome, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            subscribers_reached: outcome.subscribers_reached,
            timestamp: outcome.timestamp,
        }
    }
}
