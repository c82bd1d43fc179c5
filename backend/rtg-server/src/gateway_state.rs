use crate::SystemMetrics;

use rtg_auth::{SystemApiKey, TokenAuthority};
use rtg_bus::PubSubBus;
use rtg_config::Config;
use rtg_webhook::{WebhookIngestor, WebhookStats};
use rtg_ws::{AppState, ConnectionConfig, ConnectionLimits, Metrics, ShutdownCoordinator};

use std::sync::Arc;

use axum::extract::FromRef;

/// Router state: the WebSocket state plus the HTTP-only services.
#[derive(Clone)]
pub struct GatewayState {
    pub ws: AppState,
    pub ingestor: Arc<WebhookIngestor>,
    pub system_api_key: SystemApiKey,
    pub config: Arc<Config>,
    pub system: SystemMetrics,
}

impl GatewayState {
    pub fn new(
        config: Config,
        authority: Arc<TokenAuthority>,
        bus: Arc<dyn PubSubBus>,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        let ws = AppState::new(
            authority,
            Arc::clone(&bus),
            ConnectionConfig::from_config(&config.websocket),
            ConnectionLimits::from_config(&config.websocket),
            Metrics::new(),
            shutdown,
        );
        let ingestor = WebhookIngestor::from_config(&config.webhook, bus, WebhookStats::new());

        Self {
            ws,
            ingestor: Arc::new(ingestor),
            system_api_key: SystemApiKey::new(config.auth.system_api_key.clone()),
            config: Arc::new(config),
            system: SystemMetrics::new(),
        }
    }
}

impl FromRef<GatewayState> for AppState {
    fn from_ref(state: &GatewayState) -> Self {
        state.ws.clone()
    }
}
