pub mod webhook_accepted_response;
pub mod webhooks;
