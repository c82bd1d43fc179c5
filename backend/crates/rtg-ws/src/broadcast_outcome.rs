use rtg_core::WsMessage;

use chrono::{DateTime, Utc};

/// Result of a dispatched broadcast
#[derive(Debug, Clone)]
pub struct BroadcastOutcome {
    /// Matching connections on this instance
    pub subscribers_reached: usize,
    pub timestamp: DateTime<Utc>,
    pub message: WsMessage,
}
