pub mod bus_message;
pub mod channel;
pub mod error;
pub mod in_memory_bus;
pub mod message_handler;
pub mod pub_sub_bus;
pub mod redis_bus;
pub mod subscription_handle;

pub use bus_message::BusMessage;
pub use channel::{Channel, ChannelKind};
pub use error::{BusError, Result as BusResult};
pub use in_memory_bus::InMemoryBus;
pub use message_handler::{ForwardingHandler, MessageHandler};
pub use pub_sub_bus::PubSubBus;
pub use redis_bus::RedisBus;
pub use subscription_handle::SubscriptionHandle;

#[cfg(test)]
mod tests;
