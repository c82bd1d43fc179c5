use crate::{CoreError, Priority, WsMessage, WsMessageType};

use std::str::FromStr;

use serde_json::{Map, json};

fn payload(value: serde_json::Value) -> Map<String, serde_json::Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_message_type_round_trips_through_str() {
    for kind in [
        WsMessageType::Ping,
        WsMessageType::Pong,
        WsMessageType::Message,
        WsMessageType::Broadcast,
        WsMessageType::Notification,
        WsMessageType::Error,
        WsMessageType::System,
    ] {
        assert_eq!(WsMessageType::from_str(kind.as_str()).unwrap(), kind);
    }
    assert!(WsMessageType::from_str("shout").is_err());
}

#[test]
fn given_payload_when_building_ping_then_payload_dropped() {
    let message = WsMessage::new(WsMessageType::Ping, payload(json!({"a": 1})));

    assert!(message.payload.is_empty());
    assert!(message.validate().is_ok());
}

#[test]
fn given_pong_with_payload_when_parsed_then_rejected() {
    let result = WsMessage::from_json(r#"{"type":"pong","payload":{"x":1}}"#);

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn given_client_frame_without_timestamp_when_parsed_then_defaults_applied() {
    let message = WsMessage::from_json(r#"{"type":"message","payload":{"text":"hi"}}"#).unwrap();

    assert_eq!(message.message_type, WsMessageType::Message);
    assert_eq!(message.payload["text"], "hi");
    assert!(message.from_user.is_none());
}

#[test]
fn given_non_object_payload_when_parsed_then_json_error() {
    let result = WsMessage::from_json(r#"{"type":"message","payload":[1,2,3]}"#);

    assert!(matches!(result, Err(CoreError::Json { .. })));
}

#[test]
fn given_message_when_serialized_then_uses_wire_field_names() {
    let message = WsMessage::new(WsMessageType::Broadcast, payload(json!({"k": "v"})))
        .with_from_user("user-1")
        .with_priority(Priority::High);

    let value: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();

    assert_eq!(value["type"], "broadcast");
    assert_eq!(value["from_user"], "user-1");
    assert_eq!(value["priority"], "high");
    assert!(value.get("to_user").is_none());
    assert!(
        chrono::DateTime::parse_from_rfc3339(value["timestamp"].as_str().unwrap()).is_ok()
    );
}

#[test]
fn test_error_frame_carries_message() {
    let message = WsMessage::error("Invalid message format");

    assert_eq!(message.message_type, WsMessageType::Error);
    assert_eq!(message.payload["message"], "Invalid message format");
}
