use crate::WebhookProvider;

use std::str::FromStr;

use serde_json::json;

#[test]
fn test_provider_from_str_accepts_known_names() {
    for provider in WebhookProvider::ALL {
        assert_eq!(WebhookProvider::from_str(provider.as_str()).unwrap(), provider);
    }
    assert_eq!(
        WebhookProvider::from_str("Stripe").unwrap(),
        WebhookProvider::Stripe
    );
    assert!(WebhookProvider::from_str("paypal").is_err());
}

#[test]
fn given_provider_payloads_when_extracting_event_type_then_uses_provider_field() {
    let cases = [
        (WebhookProvider::Stripe, json!({"type": "payment.succeeded"}), "payment.succeeded"),
        (WebhookProvider::Github, json!({"action": "opened"}), "opened"),
        (WebhookProvider::Slack, json!({"type": "event_callback"}), "event_callback"),
        (WebhookProvider::Twilio, json!({"MessageStatus": "delivered"}), "delivered"),
        (WebhookProvider::Sendgrid, json!({"event": "bounce"}), "bounce"),
        (WebhookProvider::Custom, json!({"event_type": "order.created"}), "order.created"),
    ];

    for (provider, payload, expected) in cases {
        assert_eq!(provider.extract_event_type(&payload), expected);
    }
}

#[test]
fn given_missing_or_non_string_field_when_extracting_event_type_then_unknown() {
    assert_eq!(
        WebhookProvider::Stripe.extract_event_type(&json!({"id": "evt_1"})),
        "unknown"
    );
    assert_eq!(
        WebhookProvider::Custom.extract_event_type(&json!({"event_type": 7})),
        "unknown"
    );
    assert_eq!(WebhookProvider::Github.extract_event_type(&json!([1, 2])), "unknown");
}

#[test]
fn test_event_id_extraction() {
    assert_eq!(
        WebhookProvider::Stripe.extract_event_id(&json!({"id": "evt_123"})),
        Some("evt_123".to_string())
    );
    assert_eq!(
        WebhookProvider::Custom.extract_event_id(&json!({"event_id": 42})),
        Some("42".to_string())
    );
    assert_eq!(WebhookProvider::Github.extract_event_id(&json!({"id": 1})), None);
}
