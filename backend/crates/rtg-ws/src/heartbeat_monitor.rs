use crate::{ConnectionRegistry, Metrics, ShutdownGuard};

use std::time::Duration;

use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Background sweep that removes connections which stopped answering.
pub struct HeartbeatMonitor {
    registry: ConnectionRegistry,
    metrics: Metrics,
    interval: Duration,
    timeout: Duration,
}

impl HeartbeatMonitor {
    pub fn new(
        registry: ConnectionRegistry,
        metrics: Metrics,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            metrics,
            interval,
            timeout,
        }
    }

    /// One pass over the registry. Returns how many connections were reaped.
    pub async fn sweep(&self) -> usize {
        let reaped = self.registry.reap_stale(self.timeout).await;
        if !reaped.is_empty() {
            info!("Heartbeat sweep reaped {} connection(s)", reaped.len());
            self.metrics.heartbeat_timeouts(reaped.len());
        }
        reaped.len()
    }

    pub async fn run(self, mut shutdown: ShutdownGuard) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep().await;
                }
                _ = shutdown.wait() => {
                    debug!("Heartbeat monitor stopping");
                    break;
                }
            }
        }
    }

    pub fn spawn(self, shutdown: ShutdownGuard) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
