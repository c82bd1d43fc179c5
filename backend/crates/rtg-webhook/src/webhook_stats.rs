use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::counter;
use serde::Serialize;

/// Processed/failed webhook totals.
#[derive(Clone, Default)]
pub struct WebhookStats {
    processed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WebhookStatsSnapshot {
    pub total_processed: u64,
    pub total_failed: u64,
}

impl WebhookStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_processed(&self, provider: &str) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        counter!(format!("rtg_webhook.processed.{provider}")).increment(1);
    }

    pub fn record_failed(&self, provider: &str, reason: &str) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        counter!(format!("rtg_webhook.failed.{provider}")).increment(1);
        counter!(format!("rtg_webhook.errors.{reason}")).increment(1);
    }

    pub fn snapshot(&self) -> WebhookStatsSnapshot {
        WebhookStatsSnapshot {
            total_processed: self.processed.load(Ordering::Relaxed),
            total_failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
