use crate::web_socket_connection::close_frame;
use crate::{Connection, ConnectionId, ConnectionLimits, Result as WsErrorResult, WsError};

use rtg_auth::TenantContext;
use rtg_core::BroadcastTarget;

use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, Utf8Bytes};
use chrono::Utc;
use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::{RwLock, mpsc};
use tokio::time::Instant;

/// Close code sent when a connection goes silent or the server stops.
pub const CLOSE_GOING_AWAY: u16 = 1001;
/// Close code sent on protocol violations.
pub const CLOSE_POLICY_VIOLATION: u16 = 1008;

/// Registry for tracking active WebSocket connections
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
}

struct RegistryEntry {
    connection: Connection,
    sender: mpsc::Sender<Message>,
    last_seen: Instant,
}

#[derive(Default)]
struct RegistryInner {
    /// All active connections by connection_id
    connections: HashMap<ConnectionId, RegistryEntry>,
    by_tenant: HashMap<String, HashSet<ConnectionId>>,
    by_user: HashMap<(String, String), HashSet<ConnectionId>>,
}

impl RegistryInner {
    fn matching(&self, target: &BroadcastTarget) -> Vec<ConnectionId> {
        match target {
            BroadcastTarget::Global => self.connections.keys().copied().collect(),
            BroadcastTarget::Tenant { tenant_id } => self
                .by_tenant
                .get(tenant_id)
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default(),
            BroadcastTarget::User { tenant_id, user_id } => self
                .by_user
                .get(&(tenant_id.clone(), user_id.clone()))
                .map(|ids| ids.iter().copied().collect())
                .unwrap_or_default(),
        }
    }

    fn detach(&mut self, connection_id: ConnectionId) -> Option<RegistryEntry> {
        let entry = self.connections.remove(&connection_id)?;
        let tenant_id = entry.connection.tenant_id.clone();
        let user_key = (tenant_id.clone(), entry.connection.user_id.clone());

        if let Some(ids) = self.by_tenant.get_mut(&tenant_id) {
            ids.remove(&connection_id);
            if ids.is_empty() {
                self.by_tenant.remove(&tenant_id);
            }
        }
        if let Some(ids) = self.by_user.get_mut(&user_key) {
            ids.remove(&connection_id);
            if ids.is_empty() {
                self.by_user.remove(&user_key);
            }
        }

        Some(entry)
    }
}

impl ConnectionRegistry {
    pub fn new(limits: ConnectionLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner::default())),
            limits,
        }
    }

    pub fn limits(&self) -> &ConnectionLimits {
        &self.limits
    }

    /// Admit a connection. Fails once the instance is at capacity.
    #[track_caller]
    pub async fn admit(
        &self,
        connection_id: ConnectionId,
        identity: &TenantContext,
        sender: mpsc::Sender<Message>,
    ) -> WsErrorResult<Connection> {
        let caller = Location::caller();
        let mut inner = self.inner.write().await;

        // Check total connection limit
        if inner.connections.len() >= self.limits.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                inner.connections.len(),
                self.limits.max_total
            );
            return Err(WsError::CapacityExceeded {
                current: inner.connections.len(),
                max: self.limits.max_total,
                location: ErrorLocation::from(caller),
            });
        }

        if inner.connections.contains_key(&connection_id) {
            return Err(WsError::DuplicateConnection {
                connection_id: connection_id.to_string(),
                location: ErrorLocation::from(caller),
            });
        }

        let now = Utc::now();
        let connection = Connection {
            connection_id,
            user_id: identity.user_id.clone(),
            tenant_id: identity.tenant_id.clone(),
            scope: identity.scope.clone(),
            role: identity.role.clone(),
            connected_at: now,
            last_heartbeat: now,
        };

        inner
            .by_tenant
            .entry(connection.tenant_id.clone())
            .or_default()
            .insert(connection_id);
        inner
            .by_user
            .entry((connection.tenant_id.clone(), connection.user_id.clone()))
            .or_default()
            .insert(connection_id);
        inner.connections.insert(
            connection_id,
            RegistryEntry {
                connection: connection.clone(),
                sender,
                last_seen: Instant::now(),
            },
        );

        info!(
            "Registered connection {connection_id} for user {} in tenant {} ({} total)",
            connection.user_id,
            connection.tenant_id,
            inner.connections.len()
        );

        Ok(connection)
    }

    /// Remove a connection. Removing twice is a no-op.
    pub async fn remove(&self, connection_id: ConnectionId) -> Option<Connection> {
        let mut inner = self.inner.write().await;

        let entry = inner.detach(connection_id)?;
        info!(
            "Unregistered connection {connection_id} ({} total remaining)",
            inner.connections.len()
        );
        Some(entry.connection)
    }

    /// Refresh liveness. Returns false for unknown connections.
    pub async fn heartbeat(&self, connection_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;

        match inner.connections.get_mut(&connection_id) {
            Some(entry) => {
                entry.last_seen = Instant::now();
                entry.connection.last_heartbeat = Utc::now();
                true
            }
            None => false,
        }
    }

    pub async fn contains(&self, connection_id: ConnectionId) -> bool {
        self.inner.read().await.connections.contains_key(&connection_id)
    }

    pub async fn get_by_id(&self, connection_id: ConnectionId) -> Option<Connection> {
        let inner = self.inner.read().await;
        inner
            .connections
            .get(&connection_id)
            .map(|entry| entry.connection.clone())
    }

    /// All connections a user holds within a tenant.
    pub async fn get(&self, user_id: &str, tenant_id: &str) -> Vec<Connection> {
        let inner = self.inner.read().await;
        let target = BroadcastTarget::User {
            tenant_id: tenant_id.to_string(),
            user_id: user_id.to_string(),
        };
        Self::collect(&inner, &target)
    }

    pub async fn list_by_tenant(&self, tenant_id: &str) -> Vec<Connection> {
        let inner = self.inner.read().await;
        let target = BroadcastTarget::Tenant {
            tenant_id: tenant_id.to_string(),
        };
        Self::collect(&inner, &target)
    }

    pub async fn snapshot(&self) -> Vec<Connection> {
        let inner = self.inner.read().await;
        let mut connections: Vec<Connection> = inner
            .connections
            .values()
            .map(|entry| entry.connection.clone())
            .collect();
        connections.sort_by_key(|connection| connection.connected_at);
        connections
    }

    /// Get total connection count
    pub async fn total_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }

    /// Number of tenants with at least one connection
    pub async fn tenant_count(&self) -> usize {
        self.inner.read().await.by_tenant.len()
    }

    /// Number of distinct (tenant, user) pairs connected
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.by_user.len()
    }

    /// Connections a broadcast to `target` would reach on this instance.
    pub async fn count_targets(&self, target: &BroadcastTarget) -> usize {
        self.inner.read().await.matching(target).len()
    }

    /// Write `frame` to every matching connection. Full or closed send
    /// buffers are skipped and not counted.
    pub async fn deliver(&self, target: &BroadcastTarget, frame: Utf8Bytes) -> usize {
        let inner = self.inner.read().await;
        let mut delivered = 0;

        for connection_id in inner.matching(target) {
            let Some(entry) = inner.connections.get(&connection_id) else {
                continue;
            };
            match entry.sender.try_send(Message::Text(frame.clone())) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("Send buffer full for connection {connection_id}, dropping frame");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Connection {connection_id} closed, skipping frame");
                }
            }
        }

        delivered
    }

    /// Remove every connection silent for longer than `timeout` and ask
    /// its writer to close the socket.
    pub async fn reap_stale(&self, timeout: Duration) -> Vec<Connection> {
        let mut inner = self.inner.write().await;
        let now = Instant::now();

        let stale: Vec<ConnectionId> = inner
            .connections
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_seen) > timeout)
            .map(|(id, _)| *id)
            .collect();

        let mut reaped = Vec::with_capacity(stale.len());
        for connection_id in stale {
            let Some(entry) = inner.detach(connection_id) else {
                continue;
            };
            let _ = entry
                .sender
                .try_send(close_frame(CLOSE_GOING_AWAY, "heartbeat timeout"));
            warn!("Connection {connection_id} missed heartbeats, removed");
            reaped.push(entry.connection);
        }

        reaped
    }

    fn collect(inner: &RegistryInner, target: &BroadcastTarget) -> Vec<Connection> {
        inner
            .matching(target)
            .into_iter()
            .filter_map(|id| inner.connections.get(&id))
            .map(|entry| entry.connection.clone())
            .collect()
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
        }
    }
}
