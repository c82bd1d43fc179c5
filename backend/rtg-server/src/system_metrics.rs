use std::sync::{Arc, Mutex};
use std::time::Instant;

use sysinfo::{ProcessesToUpdate, System};

/// Process-level figures for the metrics endpoint.
#[derive(Clone)]
pub struct SystemMetrics {
    started_at: Instant,
    system: Arc<Mutex<System>>,
}

impl SystemMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            system: Arc::new(Mutex::new(System::new())),
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// Resident memory of this process in MB, 0.0 when unavailable.
    pub fn memory_usage_mb(&self) -> f64 {
        let Ok(pid) = sysinfo::get_current_pid() else {
            return 0.0;
        };
        let Ok(mut system) = self.system.lock() else {
            return 0.0;
        };

        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), false);
        let bytes = system.process(pid).map_or(0, sysinfo::Process::memory);
        bytes as f64 / (1024.0 * 1024.0)
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new()
    }
}
