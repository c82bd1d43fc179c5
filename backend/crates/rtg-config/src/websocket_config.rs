use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Connection capacity per gateway instance
pub const MIN_MAX_CONNECTIONS: usize = 1;
pub const MAX_MAX_CONNECTIONS: usize = 1_000_000;
pub const DEFAULT_MAX_CONNECTIONS: usize = 10_000;

// Send buffer size constraints
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 100;

// Heartbeat interval constraints (seconds)
pub const MIN_HEARTBEAT_INTERVAL_SECS: u64 = 5;
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

// Missed heartbeats tolerated before a connection is reaped
pub const MIN_MISSED_HEARTBEAT_TOLERANCE: u32 = 1;
pub const MAX_MISSED_HEARTBEAT_TOLERANCE: u32 = 10;
pub const DEFAULT_MISSED_HEARTBEAT_TOLERANCE: u32 = 2;

// Inbound frame size constraints (bytes)
pub const MIN_MESSAGE_MAX_SIZE: usize = 1024;
pub const MAX_MESSAGE_MAX_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_MESSAGE_MAX_SIZE: usize = 65536;

/// WebSocket connection settings.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    pub max_connections_per_instance: usize,
    /// Heartbeat ping interval in seconds
    pub heartbeat_interval_secs: u64,
    pub missed_heartbeat_tolerance: u32,
    /// Largest accepted inbound frame in bytes
    pub message_max_size: usize,
    /// Outbound frames queued per connection
    pub send_buffer_size: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_connections_per_instance: DEFAULT_MAX_CONNECTIONS,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            missed_heartbeat_tolerance: DEFAULT_MISSED_HEARTBEAT_TOLERANCE,
            message_max_size: DEFAULT_MESSAGE_MAX_SIZE,
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
        }
    }
}

impl WebSocketConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    /// Silence after which a connection is considered dead.
    pub fn heartbeat_timeout(&self) -> Duration {
        self.heartbeat_interval() * self.missed_heartbeat_tolerance
    }

    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_connections_per_instance < MIN_MAX_CONNECTIONS
            || self.max_connections_per_instance > MAX_MAX_CONNECTIONS
        {
            return Err(ConfigError::config(format!(
                "websocket.max_connections_per_instance must be {}-{}, got {}",
                MIN_MAX_CONNECTIONS, MAX_MAX_CONNECTIONS, self.max_connections_per_instance
            )));
        }

        if self.send_buffer_size < MIN_SEND_BUFFER_SIZE
            || self.send_buffer_size > MAX_SEND_BUFFER_SIZE
        {
            return Err(ConfigError::config(format!(
                "websocket.send_buffer_size must be {}-{}, got {}",
                MIN_SEND_BUFFER_SIZE, MAX_SEND_BUFFER_SIZE, self.send_buffer_size
            )));
        }

        if self.heartbeat_interval_secs < MIN_HEARTBEAT_INTERVAL_SECS
            || self.heartbeat_interval_secs > MAX_HEARTBEAT_INTERVAL_SECS
        {
            return Err(ConfigError::config(format!(
                "websocket.heartbeat_interval_secs must be {}-{}, got {}",
                MIN_HEARTBEAT_INTERVAL_SECS,
                MAX_HEARTBEAT_INTERVAL_SECS,
                self.heartbeat_interval_secs
            )));
        }

        if self.missed_heartbeat_tolerance < MIN_MISSED_HEARTBEAT_TOLERANCE
            || self.missed_heartbeat_tolerance > MAX_MISSED_HEARTBEAT_TOLERANCE
        {
            return Err(ConfigError::config(format!(
                "websocket.missed_heartbeat_tolerance must be {}-{}, got {}",
                MIN_MISSED_HEARTBEAT_TOLERANCE,
                MAX_MISSED_HEARTBEAT_TOLERANCE,
                self.missed_heartbeat_tolerance
            )));
        }

        if self.message_max_size < MIN_MESSAGE_MAX_SIZE
            || self.message_max_size > MAX_MESSAGE_MAX_SIZE
        {
            return Err(ConfigError::config(format!(
                "websocket.message_max_size must be {}-{}, got {}",
                MIN_MESSAGE_MAX_SIZE, MAX_MESSAGE_MAX_SIZE, self.message_max_size
            )));
        }

        Ok(())
    }
}
