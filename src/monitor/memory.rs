use std::time::Duration;
use sysinfo::System;

use crate::monitor::MetricSample;

/// RAM usage percentage plus the swap percentage and available capacity
/// shown in the chart overlay. Polled every 500ms.
pub struct MemorySensor {
    current: MetricSample,
    swap_percent: f64,
    available_mb: u64,
    initialized: bool,
}

impl MemorySensor {
    pub const TITLE: &'static str = "Memory";

    pub fn new() -> Self {
        Self {
            current: 0.0,
            swap_percent: 0.0,
            available_mb: 0,
            initialized: false,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(500)
    }

    pub fn poll(&mut self, system: &mut System) {
        system.refresh_memory();
        let total = system.total_memory();
        if total == 0 {
            return;
        }
        self.current = (system.used_memory() as f64 / total as f64 * 100.0).clamp(0.0, 100.0);

        let total_swap = system.total_swap();
        self.swap_percent = if total_swap > 0 {
            (system.used_swap() as f64 / total_swap as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        self.available_mb = system.available_memory() / (1024 * 1024);
        self.initialized = true;
    }

    pub fn current_value(&self) -> MetricSample {
        self.current
    }

    pub fn swap_percent(&self) -> f64 {
        self.swap_percent
    }

    pub fn available_mb(&self) -> u64 {
        self.available_mb
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }
}

impl Default for MemorySensor {
    fn default() -> Self {
        Self::new()
    }
}
