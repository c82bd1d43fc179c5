pub mod error;
pub mod models;

pub use error::{CoreError, Result as CoreResult};
pub use models::broadcast_request::{BroadcastRequest, BroadcastTarget, Principal};
pub use models::priority::Priority;
pub use models::webhook_event::WebhookEvent;
pub use models::webhook_provider::WebhookProvider;
pub use models::ws_message::WsMessage;
pub use models::ws_message_type::WsMessageType;

/// Scope a client token must carry to open a WebSocket connection.
pub const SCOPE_WS_CONNECT: &str = "ws:connect";

/// Scope a user token must carry to call the tenant/user broadcast endpoints.
pub const SCOPE_BROADCAST_SEND: &str = "broadcast:send";

#[cfg(test)]
mod tests;
