pub mod error;
pub mod retry;
pub mod webhook_ingestor;
pub mod webhook_registration;
pub mod webhook_registry;
pub mod webhook_stats;

pub use error::{Result as WebhookResult, WebhookError};
pub use retry::{IsRetryable, RetryPolicy, with_retry};
pub use webhook_ingestor::{
    GITHUB_DELIVERY_HEADER, SIGNATURE_HEADER, TENANT_HEADER, WebhookIngestor,
};
pub use webhook_registration::WebhookRegistration;
pub use webhook_registry::WebhookRegistry;
pub use webhook_stats::{WebhookStats, WebhookStatsSnapshot};

pub(crate) use error::Result;
