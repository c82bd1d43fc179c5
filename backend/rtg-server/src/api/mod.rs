pub mod broadcast;
pub mod debug;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod webhooks;
