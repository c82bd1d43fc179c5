//! Runs against a live Redis: `REDIS_HOST=localhost cargo test -p rtg-bus -- --ignored`

use rtg_bus::{Channel, ForwardingHandler, PubSubBus, RedisBus};
use rtg_config::RedisConfig;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

fn redis_config() -> RedisConfig {
    RedisConfig {
        host: std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string()),
        ..RedisConfig::default()
    }
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn given_two_buses_when_published_on_one_then_other_receives() {
    let config = redis_config();
    let publisher = RedisBus::connect(&config).await.unwrap();
    let subscriber = RedisBus::connect(&config).await.unwrap();
    let (handler, mut received) = ForwardingHandler::channel(8);
    let channel = Channel::tenant(&format!("it-{}", uuid::Uuid::new_v4()));

    subscriber.subscribe(&channel, Arc::new(handler)).await.unwrap();
    let reached = publisher
        .publish(&channel, Bytes::from_static(b"cross-instance"))
        .await
        .unwrap();

    assert!(reached >= 1);
    let message = tokio::time::timeout(Duration::from_secs(5), received.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(message.payload, Bytes::from_static(b"cross-instance"));
    assert_eq!(subscriber.channel_count().await, 1);

    publisher.shutdown().await;
    subscriber.shutdown().await;
    assert!(!subscriber.is_connected());
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn given_unsubscribed_channel_when_published_then_nothing_received() {
    let config = redis_config();
    let bus = RedisBus::connect(&config).await.unwrap();
    let (handler, mut received) = ForwardingHandler::channel(8);
    let channel = Channel::tenant(&format!("it-{}", uuid::Uuid::new_v4()));

    let handle = bus.subscribe(&channel, Arc::new(handler)).await.unwrap();
    bus.unsubscribe(&handle).await.unwrap();
    bus.publish(&channel, Bytes::from_static(b"late")).await.unwrap();

    // The handler is dropped on unsubscribe, so the receiver may also close
    let result = tokio::time::timeout(Duration::from_millis(300), received.recv()).await;
    assert!(!matches!(result, Ok(Some(_))));
    assert_eq!(bus.channel_count().await, 0);

    bus.shutdown().await;
}
