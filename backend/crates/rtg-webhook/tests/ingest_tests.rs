use rtg_auth::WebhookVerifier;
use rtg_bus::{BusMessage, Channel, ForwardingHandler, InMemoryBus, PubSubBus};
use rtg_core::{WebhookProvider, WsMessage, WsMessageType};
use rtg_webhook::{
    GITHUB_DELIVERY_HEADER, RetryPolicy, SIGNATURE_HEADER, TENANT_HEADER, WebhookError,
    WebhookIngestor, WebhookRegistration, WebhookRegistry, WebhookStats,
};

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, HeaderValue};
use tokio::sync::mpsc;

const TENANT: &str = "tenant-a";

struct Harness {
    bus: Arc<InMemoryBus>,
    ingestor: WebhookIngestor,
    received: mpsc::Receiver<BusMessage>,
}

async fn harness(registry: WebhookRegistry, retry: RetryPolicy, timeout: Duration) -> Harness {
    let bus = Arc::new(InMemoryBus::new());
    let (handler, received) = ForwardingHandler::channel(16);
    bus.subscribe(&Channel::tenant(TENANT), Arc::new(handler))
        .await
        .unwrap();

    let ingestor = WebhookIngestor::new(
        Arc::new(registry),
        Arc::clone(&bus) as Arc<dyn PubSubBus>,
        retry,
        timeout,
        WebhookStats::new(),
    );

    Harness {
        bus,
        ingestor,
        received,
    }
}

async fn default_harness() -> Harness {
    harness(
        WebhookRegistry::new(),
        RetryPolicy::default(),
        Duration::from_secs(30),
    )
    .await
}

fn tenant_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TENANT_HEADER, HeaderValue::from_static(TENANT));
    headers
}

fn published(received: &mut mpsc::Receiver<BusMessage>) -> Option<WsMessage> {
    received
        .try_recv()
        .ok()
        .map(|message| WsMessage::from_json(message.as_text().unwrap()).unwrap())
}

#[tokio::test]
async fn given_stripe_event_when_ingested_then_notification_published_to_tenant() {
    // Given
    let mut h = default_harness().await;
    let body = br#"{"id":"evt_123","type":"payment_intent.succeeded","data":{"amount":100}}"#;

    // When
    let event = h
        .ingestor
        .ingest(WebhookProvider::Stripe, body, &tenant_headers())
        .await
        .unwrap();

    // Then
    assert_eq!(event.event_type, "payment_intent.succeeded");
    assert_eq!(event.event_id.as_deref(), Some("evt_123"));
    let message = published(&mut h.received).expect("notification published");
    assert_eq!(message.message_type, WsMessageType::Notification);
    assert_eq!(message.payload["source"], "webhook");
    assert_eq!(message.payload["provider"], "stripe");
    assert_eq!(message.payload["event_type"], "payment_intent.succeeded");
    assert_eq!(message.payload["data"]["data"]["amount"], 100);
    assert_eq!(h.ingestor.stats().snapshot().total_processed, 1);
}

#[tokio::test]
async fn given_missing_tenant_header_when_ingested_then_tenant_required() {
    let mut h = default_harness().await;

    let result = h
        .ingestor
        .ingest(WebhookProvider::Custom, b"{}", &HeaderMap::new())
        .await;

    assert!(matches!(result, Err(WebhookError::TenantRequired { .. })));
    assert!(published(&mut h.received).is_none());
    assert_eq!(h.ingestor.stats().snapshot().total_failed, 1);
}

#[tokio::test]
async fn given_malformed_json_when_ingested_then_malformed_payload() {
    let mut h = default_harness().await;

    let result = h
        .ingestor
        .ingest(WebhookProvider::Custom, b"{not json", &tenant_headers())
        .await;

    assert!(matches!(result, Err(WebhookError::MalformedPayload { .. })));
    assert!(published(&mut h.received).is_none());
}

#[tokio::test]
async fn given_registered_secret_when_signature_valid_then_accepted() {
    // Given
    let mut registry = WebhookRegistry::new();
    registry.register(WebhookRegistration::new(
        WebhookProvider::Github,
        TENANT,
        "gh-secret",
    ));
    let mut h = harness(registry, RetryPolicy::default(), Duration::from_secs(30)).await;
    let body = br#"{"action":"opened"}"#;
    let mut headers = tenant_headers();
    headers.insert(
        SIGNATURE_HEADER,
        HeaderValue::from_str(&WebhookVerifier::sign(body, "gh-secret")).unwrap(),
    );
    headers.insert(GITHUB_DELIVERY_HEADER, HeaderValue::from_static("delivery-42"));

    // When
    let event = h
        .ingestor
        .ingest(WebhookProvider::Github, body, &headers)
        .await
        .unwrap();

    // Then
    assert_eq!(event.event_type, "opened");
    assert_eq!(event.event_id.as_deref(), Some("delivery-42"));
    assert!(published(&mut h.received).is_some());
}

#[tokio::test]
async fn given_registered_secret_when_signature_wrong_then_invalid_signature() {
    let mut registry = WebhookRegistry::new();
    registry.set_provider_secret(WebhookProvider::Stripe, "right".to_string());
    let mut h = harness(registry, RetryPolicy::default(), Duration::from_secs(30)).await;
    let body = br#"{"type":"charge.failed"}"#;
    let mut headers = tenant_headers();
    headers.insert(
        SIGNATURE_HEADER,
        HeaderValue::from_str(&WebhookVerifier::sign(body, "wrong")).unwrap(),
    );

    let result = h
        .ingestor
        .ingest(WebhookProvider::Stripe, body, &headers)
        .await;

    assert!(matches!(result, Err(WebhookError::InvalidSignature { .. })));
    assert!(published(&mut h.received).is_none());
}

#[tokio::test]
async fn given_registered_secret_when_signature_missing_then_invalid_signature() {
    let mut registry = WebhookRegistry::new();
    registry.set_provider_secret(WebhookProvider::Stripe, "right".to_string());
    let h = harness(registry, RetryPolicy::default(), Duration::from_secs(30)).await;

    let result = h
        .ingestor
        .ingest(WebhookProvider::Stripe, b"{}", &tenant_headers())
        .await;

    assert!(matches!(result, Err(WebhookError::InvalidSignature { .. })));
}

#[tokio::test(start_paused = true)]
async fn given_broker_outage_when_ingested_then_delivery_failed_after_retries() {
    // Given
    let retry = RetryPolicy {
        max_retries: 2,
        delay: Duration::from_secs(5),
    };
    let h = harness(WebhookRegistry::new(), retry, Duration::from_secs(30)).await;
    h.bus.set_available(false);
    let started = tokio::time::Instant::now();

    // When
    let result = h
        .ingestor
        .ingest(WebhookProvider::Custom, br#"{"event_type":"x"}"#, &tenant_headers())
        .await;

    // Then
    match result {
        Err(WebhookError::DeliveryFailed { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected DeliveryFailed, got {other:?}"),
    }
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert_eq!(h.ingestor.stats().snapshot().total_failed, 1);
}

#[tokio::test(start_paused = true)]
async fn given_outage_longer_than_timeout_when_ingested_then_bounded_by_timeout() {
    let retry = RetryPolicy {
        max_retries: 10,
        delay: Duration::from_secs(5),
    };
    let h = harness(WebhookRegistry::new(), retry, Duration::from_secs(12)).await;
    h.bus.set_available(false);
    let started = tokio::time::Instant::now();

    let result = h
        .ingestor
        .ingest(WebhookProvider::Custom, b"{}", &tenant_headers())
        .await;

    assert!(matches!(result, Err(WebhookError::DeliveryFailed { .. })));
    assert!(started.elapsed() < Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn given_broker_recovers_when_ingest_retrying_then_delivered() {
    // Given
    let retry = RetryPolicy {
        max_retries: 3,
        delay: Duration::from_secs(5),
    };
    let mut h = harness(WebhookRegistry::new(), retry, Duration::from_secs(30)).await;
    h.bus.set_available(false);
    let bus = Arc::clone(&h.bus);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(7)).await;
        bus.set_available(true);
    });

    // When
    let result = h
        .ingestor
        .ingest(WebhookProvider::Custom, b"{}", &tenant_headers())
        .await;

    // Then
    assert!(result.is_ok());
    assert!(published(&mut h.received).is_some());
}
