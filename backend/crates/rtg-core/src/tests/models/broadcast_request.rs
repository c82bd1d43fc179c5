use crate::{BroadcastRequest, BroadcastTarget, Principal, Priority, WsMessageType};

use serde_json::{Map, json};

#[test]
fn given_system_principal_when_enveloped_then_from_user_is_system() {
    let request = BroadcastRequest::new(BroadcastTarget::Global, Principal::System, Map::new())
        .with_message_type(WsMessageType::System);

    let message = request.to_ws_message();

    assert_eq!(message.message_type, WsMessageType::System);
    assert_eq!(message.from_user.as_deref(), Some("system"));
    assert_eq!(message.priority, Some(Priority::Normal));
    assert!(message.message_id.is_some());
}

#[test]
fn given_user_target_when_enveloped_then_to_user_set() {
    let principal = Principal::User {
        user_id: "alice".to_string(),
        tenant_id: "t1".to_string(),
    };
    let target = BroadcastTarget::User {
        tenant_id: "t1".to_string(),
        user_id: "bob".to_string(),
    };
    let payload = json!({"text": "hi"}).as_object().cloned().unwrap();

    let message = BroadcastRequest::new(target, principal, payload)
        .with_priority(Priority::Urgent)
        .to_ws_message();

    assert_eq!(message.from_user.as_deref(), Some("alice"));
    assert_eq!(message.to_user.as_deref(), Some("bob"));
    assert_eq!(message.priority, Some(Priority::Urgent));
    assert_eq!(message.payload["text"], "hi");
}

#[test]
fn test_target_tenant_id() {
    assert_eq!(
        BroadcastTarget::Tenant {
            tenant_id: "t9".to_string()
        }
        .tenant_id(),
        Some("t9")
    );
    assert_eq!(BroadcastTarget::Global.tenant_id(), None);
}
