#![allow(dead_code)]

use rtg_auth::TokenAuthority;
use rtg_bus::{InMemoryBus, PubSubBus};
use rtg_ws::{
    AppState, ConnectionConfig, ConnectionLimits, ConnectionRegistry, Metrics, ShutdownCoordinator,
};

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;

/// Default JWT secret for all tests (HS256 requires at least 32 bytes)
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-integration-tests-min-32-bytes-long";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub jwt_secret: Vec<u8>,
    pub max_connections_total: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: TEST_JWT_SECRET.to_vec(),
            max_connections_total: 100,
        }
    }
}

impl TestServerConfig {
    /// Create config with strict connection limits (for limit tests)
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections_total: 2,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
    pub bus: Arc<InMemoryBus>,
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let bus = Arc::new(InMemoryBus::new());
    let (app, app_state) = create_app(config, Arc::clone(&bus) as Arc<dyn PubSubBus>);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState {
        server,
        app_state,
        bus,
    }
}

/// Poll until the registry holds `expected` connections
pub async fn wait_for_count(registry: &ConnectionRegistry, expected: usize) -> bool {
    for _ in 0..50 {
        if registry.total_count().await == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

/// Build the Axum Router with AppState
fn create_app(config: TestServerConfig, bus: Arc<dyn PubSubBus>) -> (Router, AppState) {
    let authority = Arc::new(TokenAuthority::with_hs256(&config.jwt_secret));
    let limits = ConnectionLimits {
        max_total: config.max_connections_total,
    };

    let app_state = AppState::new(
        authority,
        bus,
        ConnectionConfig::default(),
        limits,
        Metrics::default(),
        ShutdownCoordinator::new(),
    );

    let router = Router::new()
        .route("/ws", get(rtg_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}
