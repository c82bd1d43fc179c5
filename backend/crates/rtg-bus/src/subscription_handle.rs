use crate::Channel;

use uuid::Uuid;

/// Identifies one handler registration on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    pub id: Uuid,
    pub channel: Channel,
}

impl SubscriptionHandle {
    pub fn new(channel: Channel) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
        }
    }
}
