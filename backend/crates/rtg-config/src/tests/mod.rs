mod web_socket;

use std::env;

use tempfile::TempDir;

/// Every variable `Config::load` reads, cleared so ambient shell values
/// (HOST and PORT in particular) cannot leak into assertions.
const CONFIG_ENV_VARS: &[&str] = &[
    "APP_NAME",
    "ENVIRONMENT",
    "DEBUG",
    "HOST",
    "PORT",
    "METRICS_ENABLED",
    "JWT_SECRET_KEY",
    "JWT_ALGORITHM",
    "JWT_PUBLIC_KEY_PATH",
    "JWT_PRIVATE_KEY_PATH",
    "JWT_ACCESS_TOKEN_EXPIRE_MINUTES",
    "SYSTEM_API_KEY",
    "REDIS_ENABLED",
    "REDIS_HOST",
    "REDIS_PORT",
    "REDIS_DB",
    "REDIS_PASSWORD",
    "WS_MAX_CONNECTIONS_PER_INSTANCE",
    "WS_HEARTBEAT_INTERVAL",
    "WS_MISSED_HEARTBEAT_TOLERANCE",
    "WS_MESSAGE_MAX_SIZE",
    "WS_SEND_BUFFER_SIZE",
    "WEBHOOK_MAX_RETRIES",
    "WEBHOOK_RETRY_DELAY",
    "WEBHOOK_TIMEOUT",
    "WEBHOOK_SECRET_STRIPE",
    "WEBHOOK_SECRET_GITHUB",
    "WEBHOOK_SECRET_SLACK",
    "WEBHOOK_SECRET_TWILIO",
    "WEBHOOK_SECRET_SENDGRID",
    "WEBHOOK_SECRET_CUSTOM",
    "CORS_ENABLED",
    "ALLOWED_ORIGINS",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "LOG_FILE",
    "LOG_COLORED",
];

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Isolated configuration environment: empty temp config dir, no overrides.
pub(crate) struct TestEnv {
    pub(crate) dir: TempDir,
    _guards: Vec<EnvGuard>,
}

impl TestEnv {
    pub(crate) fn write_config(&self, contents: &str) {
        std::fs::write(self.dir.path().join(crate::CONFIG_FILE_NAME), contents).unwrap();
    }
}

/// Create a temp config directory, point RTG_CONFIG_DIR at it and clear overrides
pub(crate) fn setup_config_dir() -> TestEnv {
    let dir = TempDir::new().unwrap();
    let mut guards: Vec<EnvGuard> = CONFIG_ENV_VARS
        .iter()
        .copied()
        .map(EnvGuard::remove)
        .collect();
    guards.push(EnvGuard::set(
        crate::CONFIG_DIR_ENV,
        dir.path().to_str().unwrap(),
    ));

    TestEnv {
        dir,
        _guards: guards,
    }
}
