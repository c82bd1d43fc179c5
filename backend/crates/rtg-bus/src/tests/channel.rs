use crate::{Channel, ChannelKind};

use rtg_core::BroadcastTarget;

use proptest::prelude::*;

#[test]
fn test_channel_names() {
    assert_eq!(Channel::tenant("acme").as_str(), "tenant:acme");
    assert_eq!(Channel::user("acme", "u-1").as_str(), "user:acme:u-1");
    assert_eq!(Channel::global().as_str(), "global:broadcast");
}

#[test]
fn test_channel_for_target() {
    let target = BroadcastTarget::User {
        tenant_id: "acme".to_string(),
        user_id: "u-1".to_string(),
    };

    assert_eq!(Channel::for_target(&target), Channel::user("acme", "u-1"));
    assert_eq!(
        Channel::for_target(&BroadcastTarget::Global),
        Channel::global()
    );
}

#[test]
fn test_kind_of_global_channel() {
    assert_eq!(Channel::global().kind(), Some(ChannelKind::Global));
}

#[test]
fn test_kind_of_user_id_containing_colon() {
    let channel = Channel::user("acme", "auth0:42");

    assert_eq!(
        channel.kind(),
        Some(ChannelKind::User {
            tenant_id: "acme".to_string(),
            user_id: "auth0:42".to_string(),
        })
    );
}

#[test]
fn test_user_channel_escapes_colon_in_tenant_id() {
    let channel = Channel::user("acme:eu", "alice");

    assert_eq!(channel.as_str(), "user:acme%3Aeu:alice");
    assert_eq!(
        channel.kind(),
        Some(ChannelKind::User {
            tenant_id: "acme:eu".to_string(),
            user_id: "alice".to_string(),
        })
    );
}

#[test]
fn test_colon_tenant_and_colon_user_channels_differ() {
    let colon_tenant = Channel::user("acme:eu", "alice");
    let colon_user = Channel::user("acme", "eu:alice");

    assert_ne!(colon_tenant, colon_user);
    assert_eq!(
        colon_user.kind(),
        Some(ChannelKind::User {
            tenant_id: "acme".to_string(),
            user_id: "eu:alice".to_string(),
        })
    );
}

#[test]
fn test_user_channel_escapes_percent_in_tenant_id() {
    let channel = Channel::user("50%3Aoff", "u-1");

    assert_eq!(channel.as_str(), "user:50%253Aoff:u-1");
    assert_eq!(
        channel.kind(),
        Some(ChannelKind::User {
            tenant_id: "50%3Aoff".to_string(),
            user_id: "u-1".to_string(),
        })
    );
}

#[test]
fn test_kind_rejects_unknown_escape() {
    assert_eq!(Channel::from("user:acme%2Feu:alice").kind(), None);
    assert_eq!(Channel::from("user:acme%3:alice").kind(), None);
}

#[test]
fn test_kind_of_foreign_or_empty_channels() {
    assert_eq!(Channel::from("presence:acme").kind(), None);
    assert_eq!(Channel::from("tenant:").kind(), None);
    assert_eq!(Channel::from("user:acme").kind(), None);
    assert_eq!(Channel::from("user::u-1").kind(), None);
}

proptest! {
    #[test]
    fn tenant_channels_parse_back(tenant_id in "[a-zA-Z0-9_-]{1,64}") {
        let kind = Channel::tenant(&tenant_id).kind();
        prop_assert_eq!(kind, Some(ChannelKind::Tenant { tenant_id: tenant_id.clone() }));
    }

    #[test]
    fn user_channels_parse_back_to_target(
        tenant_id in "[a-zA-Z0-9_:%-]{1,64}",
        user_id in "[a-zA-Z0-9_:@.-]{1,64}",
    ) {
        let target = BroadcastTarget::User { tenant_id, user_id };
        let parsed = Channel::for_target(&target).kind().map(BroadcastTarget::from);
        prop_assert_eq!(parsed, Some(target));
    }
}
