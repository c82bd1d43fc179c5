#![allow(dead_code)]

//! Test infrastructure for rtg-server tests

use rtg_auth::TokenAuthority;
use rtg_bus::{InMemoryBus, PubSubBus};
use rtg_config::Config;
use rtg_core::SCOPE_WS_CONNECT;
use rtg_server::{GatewayState, build_router};
use rtg_ws::ShutdownCoordinator;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body, response::Response};
use axum_test::{TestServer, TestWebSocket};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

/// HS256 secret shared by the gateway and the tokens minted in tests
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-integration-tests-min-32-bytes-long";

pub const TEST_SYSTEM_API_KEY: &str = "test-system-api-key-0123456789";

/// Config with Redis off and fast webhook retries
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.redis.enabled = false;
    config.auth.jwt_secret_key = TEST_JWT_SECRET.to_string();
    config.auth.jwt_algorithm = "HS256".to_string();
    config.auth.system_api_key = TEST_SYSTEM_API_KEY.to_string();
    config.webhook.max_retries = 1;
    config.webhook.retry_delay_secs = 0;
    config.webhook.timeout_secs = 5;
    config
}

/// Gateway state plus a handle on the in-memory bus behind it
pub struct TestGateway {
    pub state: GatewayState,
    pub bus: Arc<InMemoryBus>,
}

impl TestGateway {
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Server with a real HTTP transport, needed for WebSocket upgrades
    pub fn server(&self) -> TestServer {
        TestServer::builder()
            .http_transport()
            .build(self.router())
            .expect("Failed to create test server")
    }

    pub fn token(&self, tenant_id: &str, user_id: &str, scope: &str) -> String {
        self.state
            .ws
            .authority
            .issue_default(user_id, tenant_id, scope)
            .expect("Failed to issue token")
            .into_inner()
    }
}

pub fn create_gateway() -> TestGateway {
    create_gateway_with_config(test_config())
}

pub fn create_gateway_with_config(config: Config) -> TestGateway {
    let authority =
        Arc::new(TokenAuthority::from_config(&config.auth).expect("Failed to build authority"));
    let bus = Arc::new(InMemoryBus::new());
    let state = GatewayState::new(
        config,
        authority,
        Arc::clone(&bus) as Arc<dyn PubSubBus>,
        ShutdownCoordinator::new(),
    );

    TestGateway { state, bus }
}

/// `ws:connect` token that expired well beyond the verification leeway
pub fn expired_token(tenant_id: &str, user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "sub": user_id,
        "tenant_id": tenant_id,
        "scope": SCOPE_WS_CONNECT,
        "exp": now - 3600,
        "iat": now - 7200,
    });

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to encode JWT")
}

/// Open a WebSocket with a `ws:connect` token and consume the welcome frame
pub async fn connect_client(
    gateway: &TestGateway,
    server: &TestServer,
    tenant_id: &str,
    user_id: &str,
) -> TestWebSocket {
    let token = gateway.token(tenant_id, user_id, SCOPE_WS_CONNECT);

    let mut ws = server
        .get_websocket(&format!("/ws?token={token}"))
        .await
        .into_websocket()
        .await;

    let welcome: serde_json::Value = ws.receive_json().await;
    assert_eq!(welcome["type"], "system");

    ws
}

/// Next JSON frame, `None` if nothing arrives within `wait`
pub async fn try_receive_json(
    ws: &mut TestWebSocket,
    wait: Duration,
) -> Option<serde_json::Value> {
    tokio::time::timeout(wait, ws.receive_text())
        .await
        .ok()
        .map(|text| serde_json::from_str(&text).expect("Server sent invalid JSON"))
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
