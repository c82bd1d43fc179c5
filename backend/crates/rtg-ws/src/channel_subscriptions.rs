use crate::{Metrics, Result as WsErrorResult};

use rtg_auth::TenantContext;
use rtg_bus::{Channel, MessageHandler, PubSubBus, SubscriptionHandle};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Reference-counted bus subscriptions shared by every connection on
/// this instance. A channel is subscribed once, however many local
/// connections need it, and dropped when the last one leaves.
#[derive(Clone)]
pub struct ChannelSubscriptions {
    inner: Arc<Mutex<HashMap<Channel, SharedChannel>>>,
    bus: Arc<dyn PubSubBus>,
    handler: Arc<dyn MessageHandler>,
    metrics: Metrics,
}

struct SharedChannel {
    handle: SubscriptionHandle,
    subscriber_count: usize,
}

impl ChannelSubscriptions {
    pub fn new(
        bus: Arc<dyn PubSubBus>,
        handler: Arc<dyn MessageHandler>,
        metrics: Metrics,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            bus,
            handler,
            metrics,
        }
    }

    /// Channels a connection listens on: its tenant, its user, and global.
    pub fn channels_for(context: &TenantContext) -> Vec<Channel> {
        vec![
            Channel::tenant(&context.tenant_id),
            Channel::user(&context.tenant_id, &context.user_id),
            Channel::global(),
        ]
    }

    pub async fn acquire(&self, channel: &Channel) -> WsErrorResult<()> {
        let mut inner = self.inner.lock().await;

        if let Some(shared) = inner.get_mut(channel) {
            shared.subscriber_count += 1;
            log::debug!(
                "Connection joined channel {} ({} local subscribers)",
                channel,
                shared.subscriber_count
            );
            return Ok(());
        }

        let handle = self
            .bus
            .subscribe(channel, Arc::clone(&self.handler))
            .await?;
        inner.insert(
            channel.clone(),
            SharedChannel {
                handle,
                subscriber_count: 1,
            },
        );
        self.metrics.subscription_changed("subscribe");
        log::info!("Subscribed to channel {} on {}", channel, self.bus.name());

        Ok(())
    }

    pub async fn release(&self, channel: &Channel) {
        let mut inner = self.inner.lock().await;

        let Some(shared) = inner.get_mut(channel) else {
            return;
        };
        shared.subscriber_count = shared.subscriber_count.saturating_sub(1);
        if shared.subscriber_count > 0 {
            return;
        }

        if let Some(shared) = inner.remove(channel) {
            if let Err(e) = self.bus.unsubscribe(&shared.handle).await {
                log::warn!("Failed to unsubscribe from channel {}: {}", channel, e);
            }
            self.metrics.subscription_changed("unsubscribe");
            log::info!("Removed empty channel {}", channel);
        }
    }

    /// Acquire every channel for a connection. On failure nothing stays held.
    pub async fn acquire_for(&self, context: &TenantContext) -> WsErrorResult<Vec<Channel>> {
        let channels = Self::channels_for(context);
        let mut acquired = Vec::with_capacity(channels.len());

        for channel in channels {
            if let Err(e) = self.acquire(&channel).await {
                self.release_all(&acquired).await;
                return Err(e);
            }
            acquired.push(channel);
        }

        Ok(acquired)
    }

    pub async fn release_all(&self, channels: &[Channel]) {
        for channel in channels {
            self.release(channel).await;
        }
    }

    /// Local subscriber count for a channel, zero when not subscribed.
    pub async fn subscriber_count(&self, channel: &Channel) -> usize {
        let inner = self.inner.lock().await;
        inner
            .get(channel)
            .map(|shared| shared.subscriber_count)
            .unwrap_or(0)
    }

    pub async fn channel_count(&self) -> usize {
        self.inner.lock().await.len()
    }
}
