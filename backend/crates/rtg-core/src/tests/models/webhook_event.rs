use crate::{WebhookEvent, WebhookProvider, WsMessageType};

use serde_json::json;

#[test]
fn given_stripe_payload_when_converted_then_notification_wraps_data() {
    let payload = json!({"id": "evt_1", "type": "invoice.paid", "amount": 100});
    let event = WebhookEvent::from_payload(
        WebhookProvider::Stripe,
        "tenant-a".to_string(),
        payload.clone(),
    );

    let message = event.to_ws_message();

    assert_eq!(message.message_type, WsMessageType::Notification);
    assert_eq!(message.timestamp, event.received_at);
    assert_eq!(message.payload["source"], "webhook");
    assert_eq!(message.payload["provider"], "stripe");
    assert_eq!(message.payload["event_type"], "invoice.paid");
    assert_eq!(message.payload["event_id"], "evt_1");
    assert_eq!(message.payload["data"], payload);
}

#[test]
fn given_no_event_id_when_converted_then_event_id_is_null() {
    let event = WebhookEvent::from_payload(
        WebhookProvider::Github,
        "tenant-a".to_string(),
        json!({"action": "closed"}),
    );

    let message = event.to_ws_message();

    assert!(message.payload["event_id"].is_null());
    assert_eq!(message.payload["event_type"], "closed");
}
