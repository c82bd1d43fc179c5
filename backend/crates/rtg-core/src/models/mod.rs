pub mod broadcast_request;
pub mod priority;
pub mod webhook_event;
pub mod webhook_provider;
pub mod ws_message;
pub mod ws_message_type;
