use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] rtg_config::ConfigError),

    #[error("Auth setup failed: {0}")]
    Auth(#[from] rtg_auth::AuthError),

    #[error("Pub/sub bus unavailable: {0}")]
    Bus(#[from] rtg_bus::BusError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Logger error: {message}")]
    Logger { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
