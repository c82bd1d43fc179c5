use crate::api::broadcast::broadcast::{build_request, resolve_priority};

use rtg_core::{BroadcastTarget, Principal, Priority};

use serde_json::{Map, Value, json};

fn payload_with_priority(priority: &str) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("title".to_string(), json!("Maintenance"));
    payload.insert("priority".to_string(), json!(priority));
    payload
}

#[test]
fn given_explicit_priority_when_resolving_then_it_wins_over_payload() {
    let payload = payload_with_priority("low");

    assert_eq!(
        resolve_priority(Some(Priority::Urgent), &payload),
        Priority::Urgent
    );
}

#[test]
fn given_priority_only_in_payload_when_resolving_then_parsed() {
    let payload = payload_with_priority("HIGH");

    assert_eq!(resolve_priority(None, &payload), Priority::High);
}

#[test]
fn given_unparseable_payload_priority_when_resolving_then_normal() {
    let payload = payload_with_priority("whenever");

    assert_eq!(resolve_priority(None, &payload), Priority::Normal);
}

#[test]
fn given_system_principal_when_building_then_custom_sender_kept() {
    let request = build_request(
        BroadcastTarget::Tenant {
            tenant_id: "tenant-a".to_string(),
        },
        Principal::System,
        Map::new(),
        Some("billing-bot".to_string()),
    );

    assert_eq!(
        request.to_ws_message().from_user.as_deref(),
        Some("billing-bot")
    );
}

#[test]
fn given_user_principal_when_building_then_sender_cannot_be_spoofed() {
    let request = build_request(
        BroadcastTarget::Tenant {
            tenant_id: "tenant-a".to_string(),
        },
        Principal::User {
            user_id: "user-1".to_string(),
            tenant_id: "tenant-a".to_string(),
        },
        Map::new(),
        Some("admin".to_string()),
    );

    assert_eq!(request.to_ws_message().from_user.as_deref(), Some("user-1"));
}
