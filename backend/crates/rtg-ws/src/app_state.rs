use crate::{
    BroadcastDispatcher, ChannelSubscriptions, ConnectionConfig, ConnectionId, ConnectionLimits,
    ConnectionRegistry, DeliveryHandler, Metrics, ShutdownCoordinator, WebSocketConnection,
    WsError, create_connection_span,
};

use rtg_auth::{TenantContext, TokenAuthority};
use rtg_bus::{Channel, PubSubBus};
use rtg_core::SCOPE_WS_CONNECT;

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use log::{debug, error, warn};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<TokenAuthority>,
    pub bus: Arc<dyn PubSubBus>,
    pub registry: ConnectionRegistry,
    pub subscriptions: ChannelSubscriptions,
    pub dispatcher: Arc<BroadcastDispatcher>,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

impl AppState {
    pub fn new(
        authority: Arc<TokenAuthority>,
        bus: Arc<dyn PubSubBus>,
        config: ConnectionConfig,
        limits: ConnectionLimits,
        metrics: Metrics,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        let registry = ConnectionRegistry::new(limits);
        let handler = Arc::new(DeliveryHandler::new(registry.clone(), metrics.clone()));
        let subscriptions = ChannelSubscriptions::new(Arc::clone(&bus), handler, metrics.clone());
        let dispatcher = Arc::new(BroadcastDispatcher::new(
            Arc::clone(&bus),
            registry.clone(),
            metrics.clone(),
        ));

        Self {
            authority,
            bus,
            registry,
            subscriptions,
            dispatcher,
            metrics,
            shutdown,
            config,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// WebSocket upgrade handler.
///
/// Authentication, scope and admission are settled before the upgrade, so
/// a rejected client only ever sees an HTTP status.
pub async fn handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    if state.shutdown.is_shutdown() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let token = extract_token(query, &headers).ok_or_else(|| {
        warn!("WebSocket upgrade without token");
        state.metrics.connection_rejected("missing_token");
        StatusCode::UNAUTHORIZED
    })?;

    let claims = state
        .authority
        .authorize(&token, SCOPE_WS_CONNECT)
        .map_err(|e| reject(&state, WsError::from(e)))?;
    let context = TenantContext::from(claims);
    debug!(
        "WebSocket upgrade request from user {} in tenant {}",
        context.user_id, context.tenant_id
    );

    // Create bounded channel for outgoing messages (backpressure handling)
    let (tx, rx) = mpsc::channel::<Message>(state.config.send_buffer_size);
    let connection_id = ConnectionId::new();

    // Register connection (enforces connection limits)
    state
        .registry
        .admit(connection_id, &context, tx.clone())
        .await
        .map_err(|e| reject(&state, e))?;

    let channels = match state.subscriptions.acquire_for(&context).await {
        Ok(channels) => channels,
        Err(e) => {
            state.registry.remove(connection_id).await;
            return Err(reject(&state, e));
        }
    };

    let failed_state = state.clone();
    let failed_channels = channels.clone();

    Ok(ws
        .max_message_size(state.config.max_message_size)
        .on_failed_upgrade(move |e| {
            warn!("WebSocket upgrade for {connection_id} failed: {e}");
            tokio::spawn(async move {
                failed_state.registry.remove(connection_id).await;
                failed_state
                    .subscriptions
                    .release_all(&failed_channels)
                    .await;
            });
        })
        .on_upgrade(move |socket| {
            handle_socket(socket, connection_id, context, channels, tx, rx, state)
        }))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(
    socket: WebSocket,
    connection_id: ConnectionId,
    context: TenantContext,
    channels: Vec<Channel>,
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
    state: AppState,
) {
    let span = create_connection_span(connection_id, &context.tenant_id, &context.user_id);
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(
        connection_id,
        context,
        state.config.clone(),
        state.registry.clone(),
        state.subscriptions.clone(),
        channels,
        Arc::clone(&state.dispatcher),
        state.metrics.clone(),
    );

    // Handle connection lifecycle
    let result = connection
        .handle(socket, tx, rx, shutdown_guard)
        .instrument(span)
        .await;

    if let Err(e) = result {
        error!("Connection {connection_id} error: {e}");
    }
}

/// Status returned when an upgrade is refused
pub fn rejection_status(error: &WsError) -> StatusCode {
    match error {
        WsError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        WsError::Forbidden { .. } => StatusCode::FORBIDDEN,
        WsError::InvalidMessage { .. } => StatusCode::BAD_REQUEST,
        WsError::CapacityExceeded { .. } | WsError::Bus { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(state: &AppState, error: WsError) -> StatusCode {
    warn!("WebSocket upgrade rejected: {error}");
    state.metrics.connection_rejected(error.error_code());
    rejection_status(&error)
}

/// Token from `?token=` or an `Authorization: Bearer` header
fn extract_token(query: WsQuery, headers: &HeaderMap) -> Option<String> {
    if let Some(token) = query.token.filter(|token| !token.is_empty()) {
        return Some(token);
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
