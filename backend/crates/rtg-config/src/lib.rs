mod auth_config;
mod config;
mod cors_config;
mod error;
mod log_format;
mod log_level;
mod logging_config;
mod redis_config;
mod server_config;
mod webhook_config;
mod websocket_config;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use cors_config::CorsConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_format::LogFormat;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use redis_config::RedisConfig;
pub use server_config::ServerConfig;
pub use webhook_config::{WebhookConfig, WebhookRegistrationConfig};
pub use websocket_config::WebSocketConfig;

const DEFAULT_APP_NAME: &str = "realtime-gateway";
const DEFAULT_ENVIRONMENT: &str = "development";
const PRODUCTION_ENVIRONMENT: &str = "production";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8082;
const MIN_PORT: u16 = 1024;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

const CONFIG_DIR_ENV: &str = "RTG_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".rtg";
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(test)]
mod tests;
