use crate::{
    BusError, BusMessage, BusResult, Channel, MessageHandler, PubSubBus, SubscriptionHandle,
};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use error_location::ErrorLocation;
use tokio::sync::RwLock;
use uuid::Uuid;

type Handlers = Vec<(Uuid, Arc<dyn MessageHandler>)>;

/// Single-process bus. Handlers run inline, in publish order.
///
/// Availability can be switched off to simulate a broker outage.
pub struct InMemoryBus {
    subscriptions: RwLock<HashMap<Channel, Handlers>>,
    available: AtomicBool,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        log::info!(
            "In-memory bus {}",
            if available { "available" } else { "unavailable" }
        );
    }

    /// Handlers registered on `channel`.
    pub async fn subscriber_count(&self, channel: &Channel) -> usize {
        let subscriptions = self.subscriptions.read().await;
        subscriptions.get(channel).map(Vec::len).unwrap_or(0)
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PubSubBus for InMemoryBus {
    async fn publish(&self, channel: &Channel, payload: Bytes) -> BusResult<usize> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(BusError::BrokerUnavailable {
                message: "in-memory bus switched off".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        // Snapshot so handlers may use the bus without deadlocking
        let handlers: Vec<Arc<dyn MessageHandler>> = {
            let subscriptions = self.subscriptions.read().await;
            subscriptions
                .get(channel)
                .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
                .unwrap_or_default()
        };

        let message = BusMessage::new(channel.clone(), payload);
        for handler in &handlers {
            handler.handle(message.clone()).await;
        }

        log::debug!(
            "Published to {} ({} handler(s))",
            channel,
            handlers.len()
        );

        Ok(handlers.len())
    }

    async fn subscribe(
        &self,
        channel: &Channel,
        handler: Arc<dyn MessageHandler>,
    ) -> BusResult<SubscriptionHandle> {
        let handle = SubscriptionHandle::new(channel.clone());

        let mut subscriptions = self.subscriptions.write().await;
        subscriptions
            .entry(channel.clone())
            .or_default()
            .push((handle.id, handler));

        log::debug!("Subscribed to {}", channel);

        Ok(handle)
    }

    async fn unsubscribe(&self, handle: &SubscriptionHandle) -> BusResult<()> {
        let mut subscriptions = self.subscriptions.write().await;

        if let Some(handlers) = subscriptions.get_mut(&handle.channel) {
            handlers.retain(|(id, _)| *id != handle.id);
            if handlers.is_empty() {
                subscriptions.remove(&handle.channel);
                log::debug!("Removed empty channel {}", handle.channel);
            }
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn channel_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    async fn shutdown(&self) {
        self.subscriptions.write().await.clear();
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
