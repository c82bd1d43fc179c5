use crate::{
    Result as WebhookErrorResult, RetryPolicy, WebhookError, WebhookRegistry, WebhookStats,
    with_retry,
};

use rtg_auth::{AuthError, WebhookVerifier};
use rtg_bus::{Channel, PubSubBus};
use rtg_config::WebhookConfig;
use rtg_core::{WebhookEvent, WebhookProvider};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use error_location::ErrorLocation;
use http::HeaderMap;
use serde_json::Value;

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const SIGNATURE_HEADER: &str = "x-signature";
/// GitHub sends its delivery id as a header rather than in the body
pub const GITHUB_DELIVERY_HEADER: &str = "x-github-delivery";

/// Turns inbound provider webhooks into tenant notifications.
pub struct WebhookIngestor {
    registry: Arc<WebhookRegistry>,
    bus: Arc<dyn PubSubBus>,
    retry: RetryPolicy,
    timeout: Duration,
    stats: WebhookStats,
}

impl WebhookIngestor {
    pub fn new(
        registry: Arc<WebhookRegistry>,
        bus: Arc<dyn PubSubBus>,
        retry: RetryPolicy,
        timeout: Duration,
        stats: WebhookStats,
    ) -> Self {
        Self {
            registry,
            bus,
            retry,
            timeout,
            stats,
        }
    }

    pub fn from_config(
        config: &WebhookConfig,
        bus: Arc<dyn PubSubBus>,
        stats: WebhookStats,
    ) -> Self {
        Self::new(
            Arc::new(WebhookRegistry::from_config(config)),
            bus,
            RetryPolicy::from_config(config),
            config.timeout(),
            stats,
        )
    }

    pub fn stats(&self) -> &WebhookStats {
        &self.stats
    }

    pub fn registry(&self) -> &WebhookRegistry {
        &self.registry
    }

    /// Validate, normalize and publish one webhook to its tenant channel.
    pub async fn ingest(
        &self,
        provider: WebhookProvider,
        raw_body: &[u8],
        headers: &HeaderMap,
    ) -> WebhookErrorResult<WebhookEvent> {
        let result = self.process(provider, raw_body, headers).await;

        match &result {
            Ok(event) => {
                self.stats.record_processed(provider.as_str());
                log::info!(
                    "Webhook processed: provider={}, event={}, tenant={}",
                    provider,
                    event.event_type,
                    event.tenant_id
                );
            }
            Err(e) => {
                self.stats.record_failed(provider.as_str(), e.error_code());
                log::warn!("Webhook from {} rejected: {}", provider, e);
            }
        }

        result
    }

    async fn process(
        &self,
        provider: WebhookProvider,
        raw_body: &[u8],
        headers: &HeaderMap,
    ) -> WebhookErrorResult<WebhookEvent> {
        let tenant_id = header(headers, TENANT_HEADER).ok_or_else(|| {
            WebhookError::TenantRequired {
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let payload: Value =
            serde_json::from_slice(raw_body).map_err(|e| WebhookError::MalformedPayload {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if let Some(secret) = self.registry.secret_for(provider, tenant_id) {
            let signature = header(headers, SIGNATURE_HEADER).ok_or_else(|| {
                WebhookError::from(AuthError::InvalidSignature {
                    location: ErrorLocation::from(Location::caller()),
                })
            })?;
            WebhookVerifier::verify(raw_body, signature, secret)?;
        }

        let mut event = WebhookEvent::from_payload(provider, tenant_id.to_string(), payload);
        if let (None, Some(delivery)) = (&event.event_id, header(headers, GITHUB_DELIVERY_HEADER)) {
            event = event.with_event_id(delivery);
        }

        self.publish(&event).await?;
        Ok(event)
    }

    /// Publish with fixed-delay retries, the whole phase bounded by the timeout.
    async fn publish(&self, event: &WebhookEvent) -> WebhookErrorResult<()> {
        let caller = Location::caller();
        let channel = Channel::tenant(&event.tenant_id);
        let frame = event
            .to_ws_message()
            .to_json()
            .map_err(|e| WebhookError::MalformedPayload {
                message: e.to_string(),
                location: ErrorLocation::from(caller),
            })?;
        let frame = Bytes::from(frame);

        let mut attempts = 0;
        let delivery = with_retry(&self.retry, "Webhook publish", || {
            attempts += 1;
            self.bus.publish(&channel, frame.clone())
        });
        let outcome = tokio::time::timeout(self.timeout, delivery).await;

        match outcome {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(WebhookError::DeliveryFailed {
                attempts,
                message: e.to_string(),
                location: ErrorLocation::from(caller),
            }),
            Err(_) => Err(WebhookError::DeliveryFailed {
                attempts,
                message: format!("timed out after {:?}", self.timeout),
                location: ErrorLocation::from(caller),
            }),
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
