use crate::{ConnectionRegistry, Metrics};

use rtg_bus::{BusMessage, MessageHandler};
use rtg_core::BroadcastTarget;

use async_trait::async_trait;
use axum::extract::ws::Utf8Bytes;

/// Bus handler that fans a channel message out to local connections.
pub struct DeliveryHandler {
    registry: ConnectionRegistry,
    metrics: Metrics,
}

impl DeliveryHandler {
    pub fn new(registry: ConnectionRegistry, metrics: Metrics) -> Self {
        Self { registry, metrics }
    }
}

#[async_trait]
impl MessageHandler for DeliveryHandler {
    async fn handle(&self, message: BusMessage) {
        let Some(kind) = message.channel.kind() else {
            log::warn!("Dropping message on unrecognised channel {}", message.channel);
            return;
        };
        let Some(text) = message.as_text() else {
            log::warn!("Dropping non-UTF-8 message on channel {}", message.channel);
            self.metrics.error_occurred("invalid_payload");
            return;
        };

        let target = BroadcastTarget::from(kind);
        let delivered = self
            .registry
            .deliver(&target, Utf8Bytes::from(text.to_string()))
            .await;
        self.metrics.messages_sent(delivered);

        log::debug!(
            "Delivered message from {} to {} local connection(s)",
            message.channel,
            delivered
        );
    }
}
