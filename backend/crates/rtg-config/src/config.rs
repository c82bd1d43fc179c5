use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult, CorsConfig,
    DEFAULT_CONFIG_DIR, LoggingConfig, RedisConfig, ServerConfig, WebSocketConfig, WebhookConfig,
};

use rtg_core::WebhookProvider;

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub redis: RedisConfig,
    pub websocket: WebSocketConfig,
    pub webhook: WebhookConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Read `.env` from the working directory when present
    /// 2. Check for RTG_CONFIG_DIR env var, else use ./.rtg/
    /// 3. Load config.toml from that directory if it exists, else use defaults
    /// 4. Apply environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        // A missing .env file is the normal case outside development
        let _ = dotenvy::dotenv();

        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: RTG_CONFIG_DIR env var > ./.rtg/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Resolve a path from the config relative to the config directory.
    pub fn resolve_path(relative: &str) -> ConfigErrorResult<PathBuf> {
        let path = Path::new(relative);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        Ok(Self::config_dir()?.join(path))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.auth.validate(self.server.is_production())?;
        self.redis.validate()?;
        self.websocket.validate()?;
        self.webhook.validate()?;
        self.cors.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} ({}, environment={}, debug={})",
            self.server.host,
            self.server.port,
            self.server.app_name,
            self.server.environment,
            self.server.debug
        );
        info!(
            "  auth: {} (token ttl {}m)",
            self.auth.jwt_algorithm.to_ascii_uppercase(),
            self.auth.jwt_access_token_expire_minutes
        );

        if self.redis.enabled {
            info!("  redis: {}", self.redis.redacted_url());
        } else {
            info!("  redis: disabled (single-instance in-process bus)");
        }

        info!(
            "  websocket: max={}, heartbeat={}s x{}, max_frame={}B, buffer={}",
            self.websocket.max_connections_per_instance,
            self.websocket.heartbeat_interval_secs,
            self.websocket.missed_heartbeat_tolerance,
            self.websocket.message_max_size,
            self.websocket.send_buffer_size
        );
        info!(
            "  webhook: retries={}, delay={}s, timeout={}s, {} provider secret(s), {} registration(s)",
            self.webhook.max_retries,
            self.webhook.retry_delay_secs,
            self.webhook.timeout_secs,
            self.webhook.secrets.len(),
            self.webhook.registrations.len()
        );

        if self.cors.enabled {
            info!("  cors: {}", self.cors.allowed_origins.join(", "));
        } else {
            info!("  cors: disabled");
        }

        info!(
            "  logging: {} ({}, colored: {})",
            *self.logging.level,
            self.logging.format.as_str(),
            self.logging.colored
        );
        info!("  metrics: {}", self.server.metrics_enabled);
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("APP_NAME", &mut self.server.app_name);
        Self::apply_env_string("ENVIRONMENT", &mut self.server.environment);
        Self::apply_env_bool("DEBUG", &mut self.server.debug);
        Self::apply_env_string("HOST", &mut self.server.host);
        Self::apply_env_parse("PORT", &mut self.server.port);
        Self::apply_env_bool("METRICS_ENABLED", &mut self.server.metrics_enabled);

        // Auth
        Self::apply_env_string("JWT_SECRET_KEY", &mut self.auth.jwt_secret_key);
        Self::apply_env_string("JWT_ALGORITHM", &mut self.auth.jwt_algorithm);
        Self::apply_env_option_string("JWT_PUBLIC_KEY_PATH", &mut self.auth.jwt_public_key_path);
        Self::apply_env_option_string(
            "JWT_PRIVATE_KEY_PATH",
            &mut self.auth.jwt_private_key_path,
        );
        Self::apply_env_parse(
            "JWT_ACCESS_TOKEN_EXPIRE_MINUTES",
            &mut self.auth.jwt_access_token_expire_minutes,
        );
        Self::apply_env_string("SYSTEM_API_KEY", &mut self.auth.system_api_key);

        // Redis
        Self::apply_env_bool("REDIS_ENABLED", &mut self.redis.enabled);
        Self::apply_env_string("REDIS_HOST", &mut self.redis.host);
        Self::apply_env_parse("REDIS_PORT", &mut self.redis.port);
        Self::apply_env_parse("REDIS_DB", &mut self.redis.db);
        Self::apply_env_option_string("REDIS_PASSWORD", &mut self.redis.password);

        // WebSocket
        Self::apply_env_parse(
            "WS_MAX_CONNECTIONS_PER_INSTANCE",
            &mut self.websocket.max_connections_per_instance,
        );
        Self::apply_env_parse(
            "WS_HEARTBEAT_INTERVAL",
            &mut self.websocket.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "WS_MISSED_HEARTBEAT_TOLERANCE",
            &mut self.websocket.missed_heartbeat_tolerance,
        );
        Self::apply_env_parse("WS_MESSAGE_MAX_SIZE", &mut self.websocket.message_max_size);
        Self::apply_env_parse("WS_SEND_BUFFER_SIZE", &mut self.websocket.send_buffer_size);

        // Webhook
        Self::apply_env_parse("WEBHOOK_MAX_RETRIES", &mut self.webhook.max_retries);
        Self::apply_env_parse("WEBHOOK_RETRY_DELAY", &mut self.webhook.retry_delay_secs);
        Self::apply_env_parse("WEBHOOK_TIMEOUT", &mut self.webhook.timeout_secs);
        for provider in WebhookProvider::ALL {
            if let Ok(secret) = std::env::var(provider.secret_env_var()) {
                self.webhook
                    .secrets
                    .insert(provider.as_str().to_string(), secret);
            }
        }

        // CORS
        Self::apply_env_bool("CORS_ENABLED", &mut self.cors.enabled);
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            self.cors.allowed_origins = CorsConfig::parse_origins(&origins);
        }

        // Logging
        Self::apply_env_parse("LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_parse("LOG_FORMAT", &mut self.logging.format);
        Self::apply_env_option_string("LOG_FILE", &mut self.logging.file);
        Self::apply_env_bool("LOG_COLORED", &mut self.logging.colored);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val.eq_ignore_ascii_case("true") || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
