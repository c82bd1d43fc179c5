use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BusError {
    #[error("Broker unavailable: {message} {location}")]
    BrokerUnavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Redis error: {source} {location}")]
    Redis {
        #[source]
        source: redis::RedisError,
        location: ErrorLocation,
    },

    #[error("Pub/sub listener stopped {location}")]
    ListenerStopped { location: ErrorLocation },
}

impl BusError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BrokerUnavailable { .. } => "BROKER_UNAVAILABLE",
            Self::Redis { .. } => "BROKER_ERROR",
            Self::ListenerStopped { .. } => "BROKER_LISTENER_STOPPED",
        }
    }

    /// Failures worth retrying: the broker may come back.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::BrokerUnavailable { .. } => true,
            Self::Redis { source, .. } => {
                source.is_io_error()
                    || source.is_connection_dropped()
                    || source.is_connection_refusal()
                    || source.is_timeout()
            }
            Self::ListenerStopped { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BusError>;
