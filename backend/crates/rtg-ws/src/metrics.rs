use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::{counter, gauge, histogram};
use serde::Serialize;

/// Metrics collector for WebSocket operations.
///
/// Emits through the `metrics` facade and keeps local totals for the
/// JSON metrics endpoint.
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
    totals: Arc<Totals>,
}

#[derive(Default)]
struct Totals {
    messages_sent: AtomicU64,
    messages_received: AtomicU64,
    broadcasts_published: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of the local totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total_messages_sent: u64,
    pub total_messages_received: u64,
    pub total_broadcasts_published: u64,
    pub total_errors: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "rtg_ws",
            totals: Arc::new(Totals::default()),
        }
    }

    /// Record new connection established
    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    pub fn connection_rejected(&self, reason: &str) {
        counter!(format!("{}.connections.rejected.{}", self.prefix, reason)).increment(1);
    }

    /// Record message received from client
    pub fn message_received(&self, message_type: &str) {
        self.totals.messages_received.fetch_add(1, Ordering::Relaxed);
        counter!(format!("{}.messages.received", self.prefix)).increment(1);
        counter!(format!(
            "{}.messages.received.{}",
            self.prefix, message_type
        ))
        .increment(1);
    }

    /// Record frames written to clients
    pub fn messages_sent(&self, count: usize) {
        if count == 0 {
            return;
        }
        self.totals
            .messages_sent
            .fetch_add(count as u64, Ordering::Relaxed);
        counter!(format!("{}.messages.sent", self.prefix)).increment(count as u64);
    }

    /// Record broadcast message published
    pub fn broadcast_published(&self, scope: &str, subscriber_count: usize) {
        self.totals
            .broadcasts_published
            .fetch_add(1, Ordering::Relaxed);
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.published.{}", self.prefix, scope)).increment(1);
        gauge!(format!("{}.broadcast.subscribers", self.prefix)).set(subscriber_count as f64);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &str) {
        self.totals.errors.fetch_add(1, Ordering::Relaxed);
        counter!(format!("{}.errors.total", self.prefix)).increment(1);
        counter!(format!("{}.errors.{}", self.prefix, error_type)).increment(1);
    }

    /// Record broadcast latency
    pub fn message_latency(&self, duration: std::time::Duration) {
        histogram!(format!("{}.messages.latency_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }

    /// Record subscription change
    pub fn subscription_changed(&self, action: &str) {
        counter!(format!("{}.subscriptions.{}", self.prefix, action)).increment(1);
    }

    pub fn heartbeat_timeouts(&self, count: usize) {
        counter!(format!("{}.heartbeat.timeouts", self.prefix)).increment(count as u64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_messages_sent: self.totals.messages_sent.load(Ordering::Relaxed),
            total_messages_received: self.totals.messages_received.load(Ordering::Relaxed),
            total_broadcasts_published: self.totals.broadcasts_published.load(Ordering::Relaxed),
            total_errors: self.totals.errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
