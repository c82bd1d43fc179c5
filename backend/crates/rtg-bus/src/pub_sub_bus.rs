use crate::{BusResult, Channel, MessageHandler, SubscriptionHandle};

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

/// Cross-instance fan-out.
///
/// Subscribing registers a handler; it never fails because the broker is
/// down, and registrations survive reconnects. Publishing does fail with
/// `BrokerUnavailable` while the broker is unreachable.
#[async_trait]
pub trait PubSubBus: Send + Sync {
    /// Publish `payload` verbatim. Returns the number of subscribers the
    /// broker reports as reached.
    async fn publish(&self, channel: &Channel, payload: Bytes) -> BusResult<usize>;

    async fn subscribe(
        &self,
        channel: &Channel,
        handler: Arc<dyn MessageHandler>,
    ) -> BusResult<SubscriptionHandle>;

    /// Remove a registration. Unknown handles are ignored.
    async fn unsubscribe(&self, handle: &SubscriptionHandle) -> BusResult<()>;

    fn is_connected(&self) -> bool;

    /// Channels with at least one registered handler.
    async fn channel_count(&self) -> usize;

    async fn shutdown(&self);

    /// Implementation name for logs and health output.
    fn name(&self) -> &'static str;
}
