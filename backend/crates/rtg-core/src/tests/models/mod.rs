mod broadcast_request;
mod webhook_event;
mod webhook_provider;
mod ws_message;
