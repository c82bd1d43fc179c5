use crate::Metrics;

use std::time::Instant;

/// Helper for timing broadcasts
pub struct MetricsTimer {
    start: Instant,
    metrics: Metrics,
}

impl MetricsTimer {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish(self) {
        self.metrics.message_latency(self.start.elapsed());
    }
}
