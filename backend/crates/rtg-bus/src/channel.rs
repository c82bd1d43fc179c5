use rtg_core::BroadcastTarget;

use std::fmt;

const TENANT_PREFIX: &str = "tenant:";
const USER_PREFIX: &str = "user:";

/// Name of a pub/sub channel.
///
/// `tenant:{tenant_id}`, `user:{tenant_id}:{user_id}` or `global:broadcast`.
/// In user channels `%` and `:` in the tenant id are percent-encoded, so the
/// first `:` after the prefix always ends the tenant segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(String);

/// Audience encoded in a channel name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKind {
    Tenant { tenant_id: String },
    User { tenant_id: String, user_id: String },
    Global,
}

impl Channel {
    pub const GLOBAL: &'static str = "global:broadcast";

    pub fn tenant(tenant_id: &str) -> Self {
        Self(format!("{TENANT_PREFIX}{tenant_id}"))
    }

    pub fn user(tenant_id: &str, user_id: &str) -> Self {
        Self(format!("{USER_PREFIX}{}:{user_id}", encode_segment(tenant_id)))
    }

    pub fn global() -> Self {
        Self(Self::GLOBAL.to_string())
    }

    pub fn for_target(target: &BroadcastTarget) -> Self {
        match target {
            BroadcastTarget::User { tenant_id, user_id } => Self::user(tenant_id, user_id),
            BroadcastTarget::Tenant { tenant_id } => Self::tenant(tenant_id),
            BroadcastTarget::Global => Self::global(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the audience back out of the name. `None` for foreign channels.
    pub fn kind(&self) -> Option<ChannelKind> {
        if self.0 == Self::GLOBAL {
            return Some(ChannelKind::Global);
        }

        if let Some(rest) = self.0.strip_prefix(USER_PREFIX) {
            let (encoded_tenant, user_id) = rest.split_once(':')?;
            if encoded_tenant.is_empty() || user_id.is_empty() {
                return None;
            }
            return Some(ChannelKind::User {
                tenant_id: decode_segment(encoded_tenant)?,
                user_id: user_id.to_string(),
            });
        }

        match self.0.strip_prefix(TENANT_PREFIX) {
            Some(tenant_id) if !tenant_id.is_empty() => Some(ChannelKind::Tenant {
                tenant_id: tenant_id.to_string(),
            }),
            _ => None,
        }
    }
}

fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            ':' => encoded.push_str("%3A"),
            _ => encoded.push(c),
        }
    }
    encoded
}

/// Inverse of `encode_segment`. `None` on an unknown escape.
fn decode_segment(segment: &str) -> Option<String> {
    let mut decoded = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(index) = rest.find('%') {
        decoded.push_str(&rest[..index]);
        let escape = rest.get(index..index + 3)?;
        match escape {
            "%25" => decoded.push('%'),
            "%3A" => decoded.push(':'),
            _ => return None,
        }
        rest = &rest[index + 3..];
    }
    decoded.push_str(rest);
    Some(decoded)
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Channel {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ChannelKind> for BroadcastTarget {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Tenant { tenant_id } => BroadcastTarget::Tenant { tenant_id },
            ChannelKind::User { tenant_id, user_id } => {
                BroadcastTarget::User { tenant_id, user_id }
            }
            ChannelKind::Global => BroadcastTarget::Global,
        }
    }
}
