use rtg_auth::AuthError;
use rtg_bus::BusError;
use rtg_core::CoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    CapacityExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Connection {connection_id} already registered {location}")]
    DuplicateConnection {
        connection_id: String,
        location: ErrorLocation,
    },

    #[error("Unauthorized: {message} {location}")]
    Unauthorized {
        message: String,
        location: ErrorLocation,
    },

    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid message: {message} {location}")]
    InvalidMessage {
        message: String,
        location: ErrorLocation,
    },

    #[error("Message serialization failed: {source} {location}")]
    Serialization {
        #[source]
        source: CoreError,
        location: ErrorLocation,
    },

    #[error("Send buffer full, client too slow {location}")]
    SendBufferFull { location: ErrorLocation },

    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Bus error: {source} {location}")]
    Bus {
        #[source]
        source: BusError,
        location: ErrorLocation,
    },
}

impl WsError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::DuplicateConnection { .. } => "DUPLICATE_CONNECTION",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::InvalidMessage { .. } => "INVALID_MESSAGE",
            Self::Serialization { .. } => "SERIALIZATION_ERROR",
            Self::SendBufferFull { .. } => "SLOW_CLIENT",
            Self::ConnectionClosed { .. } => "CONNECTION_CLOSED",
            Self::Bus { source, .. } => source.error_code(),
        }
    }

    /// Message safe to send to a client.
    pub fn client_message(&self) -> String {
        match self {
            Self::CapacityExceeded { .. } => "Server at capacity".to_string(),
            Self::Unauthorized { message, .. }
            | Self::Forbidden { message, .. }
            | Self::InvalidMessage { message, .. } => message.clone(),
            Self::Bus { .. } => "Message delivery unavailable".to_string(),
            _ => "Internal error".to_string(),
        }
    }
}

impl From<AuthError> for WsError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        let message = source.client_message();
        match source {
            AuthError::InsufficientScope { .. } => Self::Forbidden { message, location },
            _ => Self::Unauthorized { message, location },
        }
    }
}

impl From<BusError> for WsError {
    #[track_caller]
    fn from(source: BusError) -> Self {
        Self::Bus {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for WsError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
