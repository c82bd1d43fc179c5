use crate::{
    BroadcastDispatcher, CLOSE_GOING_AWAY, CLOSE_POLICY_VIOLATION, ChannelSubscriptions,
    ConnectionConfig, ConnectionId, ConnectionRegistry, Metrics, Result as WsErrorResult,
    ShutdownGuard, WsError,
};

use rtg_auth::TenantContext;
use rtg_bus::Channel;
use rtg_core::{BroadcastRequest, BroadcastTarget, Principal, WsMessage, WsMessageType};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use serde_json::{Map, json};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

const SEND_TASK_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// How the read loop ended
enum Exit {
    ClientClosed,
    HeartbeatTimeout,
    Shutdown,
    ProtocolViolation,
}

impl Exit {
    fn reason(&self) -> &'static str {
        match self {
            Self::ClientClosed => "normal",
            Self::HeartbeatTimeout => "heartbeat_timeout",
            Self::Shutdown => "shutdown",
            Self::ProtocolViolation => "protocol_violation",
        }
    }
}

/// Manages a single WebSocket connection
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    context: TenantContext,
    config: ConnectionConfig,
    registry: ConnectionRegistry,
    subscriptions: ChannelSubscriptions,
    channels: Vec<Channel>,
    dispatcher: Arc<BroadcastDispatcher>,
    metrics: Metrics,
}

impl WebSocketConnection {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connection_id: ConnectionId,
        context: TenantContext,
        config: ConnectionConfig,
        registry: ConnectionRegistry,
        subscriptions: ChannelSubscriptions,
        channels: Vec<Channel>,
        dispatcher: Arc<BroadcastDispatcher>,
        metrics: Metrics,
    ) -> Self {
        Self {
            connection_id,
            context,
            config,
            registry,
            subscriptions,
            channels,
            dispatcher,
            metrics,
        }
    }

    /// Handle the WebSocket connection lifecycle.
    ///
    /// `tx` is the sender the registry already holds for this connection,
    /// `rx` its receiving half.
    pub async fn handle(
        self,
        socket: WebSocket,
        tx: mpsc::Sender<Message>,
        mut rx: mpsc::Receiver<Message>,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        log::info!(
            "WebSocket connection {} established for tenant {} (user {})",
            self.connection_id,
            self.context.tenant_id,
            self.context.user_id
        );
        self.metrics.connection_established();

        // Split socket into sender and receiver
        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Spawn send task; a close frame ends it
        let mut send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let closing = matches!(msg, Message::Close(_));
                if ws_sender.send(msg).await.is_err() || closing {
                    break;
                }
            }
        });

        if let Err(e) = self.send_welcome(&tx) {
            log::warn!("Welcome to connection {} not sent: {}", self.connection_id, e);
        }

        let mut ping_ticker = tokio::time::interval_at(
            Instant::now() + self.config.heartbeat_interval,
            self.config.heartbeat_interval,
        );
        ping_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let result: WsErrorResult<Exit> = loop {
            tokio::select! {
                // Handle incoming frames from client
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            self.registry.heartbeat(self.connection_id).await;
                            match self.handle_client_message(msg, &tx).await {
                                Ok(None) => {}
                                Ok(Some(exit)) => break Ok(exit),
                                Err(e) => {
                                    self.metrics.error_occurred(e.error_code());
                                    break Err(e);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            log::warn!("WebSocket error on connection {}: {}", self.connection_id, e);
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            log::info!("Connection {} closed by client", self.connection_id);
                            break Ok(Exit::ClientClosed);
                        }
                    }
                }

                _ = ping_ticker.tick() => {
                    // Reaped by the heartbeat monitor, which already queued the close frame
                    if !self.registry.contains(self.connection_id).await {
                        break Ok(Exit::HeartbeatTimeout);
                    }
                    if tx.try_send(Message::Ping(Bytes::new())).is_err() {
                        log::debug!("Ping skipped for connection {}, send buffer full", self.connection_id);
                    }
                }

                // Handle graceful shutdown
                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down connection {} gracefully", self.connection_id);
                    let _ = tx.try_send(close_frame(CLOSE_GOING_AWAY, "server shutdown"));
                    break Ok(Exit::Shutdown);
                }
            }
        };

        // Cleanup: the registry holds a sender clone, so remove first
        self.registry.remove(self.connection_id).await;
        self.subscriptions.release_all(&self.channels).await;
        drop(tx);
        if tokio::time::timeout(SEND_TASK_DRAIN_TIMEOUT, &mut send_task)
            .await
            .is_err()
        {
            send_task.abort();
        }

        let reason = match &result {
            Ok(exit) => exit.reason(),
            Err(_) => "error",
        };
        self.metrics.connection_closed(reason);

        log::info!(
            "WebSocket connection {} closed for tenant {} ({})",
            self.connection_id,
            self.context.tenant_id,
            reason
        );

        result.map(|_| ())
    }

    fn send_welcome(&self, tx: &mpsc::Sender<Message>) -> WsErrorResult<()> {
        let mut payload = Map::new();
        payload.insert("message".to_string(), json!("Connected successfully"));
        payload.insert(
            "connection_id".to_string(),
            json!(self.connection_id.to_string()),
        );
        payload.insert("user_id".to_string(), json!(self.context.user_id));
        payload.insert("tenant_id".to_string(), json!(self.context.tenant_id));

        self.send(tx, &WsMessage::system(payload))
    }

    /// Handle a frame from the client. `Some` ends the connection.
    async fn handle_client_message(
        &self,
        msg: Message,
        tx: &mpsc::Sender<Message>,
    ) -> WsErrorResult<Option<Exit>> {
        match msg {
            Message::Text(text) => {
                self.handle_text_message(text, tx).await?;
                Ok(None)
            }
            Message::Binary(data) => {
                log::warn!(
                    "Binary frame ({} bytes) from connection {}, closing",
                    data.len(),
                    self.connection_id
                );
                let _ = tx.try_send(close_frame(
                    CLOSE_POLICY_VIOLATION,
                    "binary frames are not supported",
                ));
                Ok(Some(Exit::ProtocolViolation))
            }
            // Pings are answered by the socket itself
            Message::Ping(_) | Message::Pong(_) => Ok(None),
            Message::Close(_) => {
                log::info!("Received close frame from connection {}", self.connection_id);
                Ok(Some(Exit::ClientClosed))
            }
        }
    }

    async fn handle_text_message(
        &self,
        text: Utf8Bytes,
        tx: &mpsc::Sender<Message>,
    ) -> WsErrorResult<()> {
        let message = match WsMessage::from_json(text.as_str()) {
            Ok(message) => message,
            Err(e) => {
                log::debug!("Invalid message from connection {}: {}", self.connection_id, e);
                self.metrics.error_occurred("invalid_message");
                return self.send(tx, &WsMessage::error("Invalid message format"));
            }
        };
        self.metrics.message_received(message.message_type.as_str());

        match message.message_type {
            WsMessageType::Ping => self.send(tx, &WsMessage::pong()),
            WsMessageType::Pong => Ok(()),
            WsMessageType::Message | WsMessageType::Broadcast => {
                match self.relay(message).await {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        log::warn!("Relay from connection {} failed: {}", self.connection_id, e);
                        self.metrics.error_occurred(e.error_code());
                        self.send(tx, &WsMessage::error(e.client_message()))
                    }
                }
            }
            other => {
                log::warn!(
                    "Unsupported message type {} from connection {}",
                    other.as_str(),
                    self.connection_id
                );
                self.send(tx, &WsMessage::error("Unsupported message type"))
            }
        }
    }

    /// Fan a client message out to its tenant, or to one user when `to_user` is set.
    async fn relay(&self, message: WsMessage) -> WsErrorResult<()> {
        let target = match (&message.message_type, &message.to_user) {
            (WsMessageType::Message, Some(user_id)) => BroadcastTarget::User {
                tenant_id: self.context.tenant_id.clone(),
                user_id: user_id.clone(),
            },
            _ => BroadcastTarget::Tenant {
                tenant_id: self.context.tenant_id.clone(),
            },
        };
        let principal = Principal::User {
            user_id: self.context.user_id.clone(),
            tenant_id: self.context.tenant_id.clone(),
        };

        let request = BroadcastRequest::new(target, principal, message.payload)
            .with_message_type(message.message_type)
            .with_priority(message.priority.unwrap_or_default())
            .with_from_user(self.context.user_id.clone());

        self.dispatcher.dispatch(request).await?;
        Ok(())
    }

    /// Queue a frame for this connection. A full buffer drops the frame;
    /// a closed one ends the connection.
    fn send(&self, tx: &mpsc::Sender<Message>, message: &WsMessage) -> WsErrorResult<()> {
        let json = message.to_json()?;
        match tx.try_send(Message::Text(Utf8Bytes::from(json))) {
            Ok(()) => {
                self.metrics.messages_sent(1);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                let e = WsError::SendBufferFull {
                    location: ErrorLocation::from(Location::caller()),
                };
                log::warn!(
                    "Dropping {} frame for connection {}: {}",
                    message.message_type.as_str(),
                    self.connection_id,
                    e
                );
                self.metrics.error_occurred(e.error_code());
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(WsError::ConnectionClosed {
                reason: "send task stopped".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

pub(crate) fn close_frame(code: u16, reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: Utf8Bytes::from_static(reason),
    }))
}
