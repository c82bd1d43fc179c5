use crate::{
    BroadcastOutcome, ConnectionRegistry, Metrics, MetricsTimer, Result as WsErrorResult, WsError,
};

use rtg_bus::{Channel, PubSubBus};
use rtg_core::{BroadcastRequest, BroadcastTarget, Principal};

use std::panic::Location;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use bytes::Bytes;
use error_location::ErrorLocation;

/// Authorizes broadcast requests and publishes them on the bus.
pub struct BroadcastDispatcher {
    bus: Arc<dyn PubSubBus>,
    registry: ConnectionRegistry,
    metrics: Metrics,
}

impl BroadcastDispatcher {
    pub fn new(bus: Arc<dyn PubSubBus>, registry: ConnectionRegistry, metrics: Metrics) -> Self {
        Self {
            bus,
            registry,
            metrics,
        }
    }

    /// Global broadcasts need the system principal. Tenant and user
    /// broadcasts need the system principal or a user of the same tenant.
    #[track_caller]
    pub fn authorize(request: &BroadcastRequest) -> WsErrorResult<()> {
        let caller = Location::caller();

        match (&request.principal, &request.target) {
            (Principal::System, _) => Ok(()),
            (Principal::User { .. }, BroadcastTarget::Global) => Err(WsError::Forbidden {
                message: "Global broadcast requires the system API key".to_string(),
                location: ErrorLocation::from(caller),
            }),
            (Principal::User { tenant_id, .. }, target) => {
                if target.tenant_id() == Some(tenant_id.as_str()) {
                    Ok(())
                } else {
                    Err(WsError::Forbidden {
                        message: "Cannot broadcast to another tenant".to_string(),
                        location: ErrorLocation::from(caller),
                    })
                }
            }
        }
    }

    pub async fn dispatch(&self, request: BroadcastRequest) -> WsErrorResult<BroadcastOutcome> {
        Self::authorize(&request)?;
        let timer = MetricsTimer::new(self.metrics.clone());

        let message = request.to_ws_message();
        let json = message.to_json()?;
        let channel = Channel::for_target(&request.target);

        let subscribers_reached = match self.bus.publish(&channel, Bytes::from(json.clone())).await
        {
            Ok(_) => self.registry.count_targets(&request.target).await,
            Err(e) => {
                log::warn!(
                    "Publish to {} failed ({}), delivering to local connections only",
                    channel,
                    e
                );
                self.metrics.error_occurred(e.error_code());
                let delivered = self
                    .registry
                    .deliver(&request.target, Utf8Bytes::from(json))
                    .await;
                self.metrics.messages_sent(delivered);
                delivered
            }
        };

        self.metrics
            .broadcast_published(request.target.scope_name(), subscribers_reached);
        timer.finish();

        log::info!(
            "Broadcast {} to {} ({} local subscriber(s))",
            message.message_type.as_str(),
            channel,
            subscribers_reached
        );

        Ok(BroadcastOutcome {
            subscribers_reached,
            timestamp: message.timestamp,
            message,
        })
    }
}
