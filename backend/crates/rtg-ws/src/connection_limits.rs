use rtg_config::WebSocketConfig;

/// Per-instance admission limits
#[derive(Debug, Clone)]
pub struct ConnectionLimits {
    pub max_total: usize,
}

impl ConnectionLimits {
    pub fn from_config(config: &WebSocketConfig) -> Self {
        Self {
            max_total: config.max_connections_per_instance,
        }
    }
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self::from_config(&WebSocketConfig::default())
    }
}
