pub mod broadcast;
pub mod broadcast_response;
pub mod global_broadcast_request;
pub mod tenant_broadcast_request;
pub mod user_broadcast_request;
