#![allow(dead_code)]

use crate::common::jwt_helper::create_test_token;

use rtg_core::WsMessage;

use std::time::Duration;

use axum_test::{TestServer, TestWebSocket};

/// How long a client waits before deciding nothing is coming
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
    pub tenant_id: String,
    pub user_id: String,
    /// System message received right after the upgrade
    pub welcome: WsMessage,
}

impl WsTestClient {
    /// Connect with a valid token and consume the welcome message
    pub async fn connect(
        server: &TestServer,
        tenant_id: &str,
        user_id: &str,
        jwt_secret: &[u8],
    ) -> Self {
        let token = create_test_token(tenant_id, user_id, jwt_secret);

        let mut ws = server
            .get_websocket("/ws")
            .add_header("Authorization", format!("Bearer {}", token))
            .await
            .into_websocket()
            .await;

        let welcome = parse(&ws.receive_text().await);

        Self {
            ws,
            tenant_id: tenant_id.to_string(),
            user_id: user_id.to_string(),
            welcome,
        }
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn send_message(&mut self, message: &WsMessage) {
        self.ws
            .send_text(message.to_json().expect("Failed to encode message"))
            .await;
    }

    pub async fn receive_message(&mut self) -> WsMessage {
        parse(&self.ws.receive_text().await)
    }

    /// `None` when nothing arrives within the quiet period
    pub async fn try_receive_message(&mut self) -> Option<WsMessage> {
        tokio::time::timeout(QUIET_PERIOD, self.ws.receive_text())
            .await
            .ok()
            .map(|text| parse(&text))
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }

    pub fn ws_mut(&mut self) -> &mut TestWebSocket {
        &mut self.ws
    }
}

fn parse(text: &str) -> WsMessage {
    serde_json::from_str(text).expect("Server sent invalid JSON")
}
